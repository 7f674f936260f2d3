//! Tick scheduling for interactive playback
//!
//! The controller asks a [`Scheduler`] for "one tick after `delay`" and can
//! cancel it again. Each request gets a fresh [`TickId`]; the controller only
//! acts on the id it is currently waiting for, so a tick that was cancelled or
//! superseded never causes a step even if the scheduler still delivers it.

use std::collections::VecDeque;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickId(u64);

pub trait Scheduler {
    /// Request a tick after `delay`
    fn schedule_after(&mut self, delay: Duration) -> TickId;

    /// Revoke a pending tick. Unknown or already-fired ids are ignored.
    fn cancel(&mut self, tick: TickId);

    /// Wait for and return the next due tick, or `None` when nothing is pending
    fn next_tick(&mut self) -> Option<TickId>;
}

/// Wall-clock scheduler with a single pending deadline.
/// `next_tick` blocks the calling thread until the deadline passes.
#[derive(Debug, Default)]
pub struct ClockScheduler {
    next_id: u64,
    pending: Option<(TickId, Instant)>,
}

impl ClockScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for ClockScheduler {
    fn schedule_after(&mut self, delay: Duration) -> TickId {
        let id = TickId(self.next_id);
        self.next_id += 1;
        self.pending = Some((id, Instant::now() + delay));
        id
    }

    fn cancel(&mut self, tick: TickId) {
        if matches!(self.pending, Some((id, _)) if id == tick) {
            self.pending = None;
        }
    }

    fn next_tick(&mut self) -> Option<TickId> {
        let (id, due) = self.pending.take()?;
        let now = Instant::now();
        if due > now {
            thread::sleep(due - now);
        }
        Some(id)
    }
}

/// Scheduler that never waits. Ticks fire in request order and every
/// requested delay is recorded, which is what batch runs and tests want.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    queue: VecDeque<TickId>,
    delays: Vec<Duration>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delay requested so far, oldest first
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&mut self, delay: Duration) -> TickId {
        let id = TickId(self.next_id);
        self.next_id += 1;
        self.queue.push_back(id);
        self.delays.push(delay);
        id
    }

    fn cancel(&mut self, tick: TickId) {
        self.queue.retain(|id| *id != tick);
    }

    fn next_tick(&mut self) -> Option<TickId> {
        self.queue.pop_front()
    }
}
