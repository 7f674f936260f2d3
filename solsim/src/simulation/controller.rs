//! Execution controller
//!
//! Owns the [`SimulationContext`] and the Idle / Running / Paused state
//! machine, and drives integration steps through a [`Scheduler`]:
//!
//! - `start` from Idle or Paused enters Running and steps immediately
//! - every accepted tick steps once and, if still Running, schedules the next
//!   tick after a delay derived from the playback speed
//! - `pause` cancels the pending tick; state and elapsed time are kept
//! - `load_scenario` cancels the pending tick, installs the new bodies,
//!   resets elapsed time and returns to Idle
//!
//! Batch runs (`run_batch`) step directly without touching the scheduler.

use std::fmt;

use super::engine::Engine;
use super::forces::{AccelSet, NewtonianGravity};
use super::integrator::integrate;
use super::params::{check_time_step, Parameters};
use super::scenario::Scenario;
use super::scheduler::{Scheduler, TickId};
use crate::error::{SimError, SimResult};
use crate::persistence::telemetry::TelemetrySink;
use crate::visualization::presentation::Presentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Paused,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
        };
        f.write_str(s)
    }
}

/// Everything one run needs: bodies, elapsed time, parameters, engine
/// settings, force set and the telemetry target.
///
/// `parameters` and `forces` are kept private so the gravity term always
/// carries the current `G` and `epsilon`.
pub struct SimulationContext {
    pub scenario: Scenario,
    pub elapsed: f64,
    pub engine: Engine,
    parameters: Parameters,
    forces: AccelSet,
    tracked_body: Option<usize>,
}

impl SimulationContext {
    pub fn new(
        scenario: Scenario,
        parameters: Parameters,
        engine: Engine,
        tracked_body: Option<usize>,
    ) -> SimResult<Self> {
        check_tracked(tracked_body, &scenario)?;

        Ok(Self {
            scenario,
            elapsed: 0.0,
            engine,
            forces: gravity_set(&parameters),
            parameters,
            tracked_body,
        })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn forces(&self) -> &AccelSet {
        &self.forces
    }

    /// Change the physical step. Takes effect on the next step.
    pub fn set_time_step(&mut self, dt: f64) -> SimResult<()> {
        check_time_step(dt)?;
        self.parameters.dt = dt;
        Ok(())
    }

    /// Change `G` and the coincidence guard, rebuilding the force set
    #[allow(non_snake_case)]
    pub fn set_gravity(&mut self, G: f64, epsilon: f64) -> SimResult<()> {
        let parameters = Parameters::new(self.parameters.dt, G, epsilon)?;
        self.forces = gravity_set(&parameters);
        self.parameters = parameters;
        Ok(())
    }

    pub fn tracked_body(&self) -> Option<usize> {
        self.tracked_body
    }

    pub fn set_tracked_body(&mut self, tracked_body: Option<usize>) -> SimResult<()> {
        check_tracked(tracked_body, &self.scenario)?;
        self.tracked_body = tracked_body;
        Ok(())
    }

    /// One integration step plus the elapsed-time bookkeeping
    pub fn step(&mut self) -> SimResult<()> {
        integrate(self.engine.integrator, &mut self.scenario, &self.forces, &self.parameters)?;
        self.elapsed += self.parameters.dt;
        Ok(())
    }
}

// Newtonian gravity is the only contributor
fn gravity_set(parameters: &Parameters) -> AccelSet {
    AccelSet::new().with(NewtonianGravity {
        G: parameters.G,
        epsilon: parameters.epsilon,
    })
}

fn check_tracked(tracked_body: Option<usize>, scenario: &Scenario) -> SimResult<()> {
    match tracked_body {
        Some(index) if index >= scenario.len() => Err(SimError::UnknownTrackedBody {
            index,
            len: scenario.len(),
        }),
        _ => Ok(()),
    }
}

pub struct Controller<S: Scheduler> {
    ctx: SimulationContext,
    state: RunState,
    scheduler: S,
    pending: Option<TickId>,
    presentation: Box<dyn Presentation>,
    telemetry: Option<Box<dyn TelemetrySink>>,
    steps: u64,
}

impl<S: Scheduler> Controller<S> {
    /// Start Idle with the context's scenario already announced to `presentation`
    pub fn new(ctx: SimulationContext, scheduler: S, presentation: Box<dyn Presentation>) -> Self {
        let mut controller = Self {
            ctx,
            state: RunState::Idle,
            scheduler,
            pending: None,
            presentation,
            telemetry: None,
            steps: 0,
        };
        controller.announce();
        controller
    }

    /// Enable telemetry. Records are only written while a tracked body is set.
    pub fn with_telemetry(mut self, mut sink: Box<dyn TelemetrySink>) -> Self {
        sink.begin_run();
        self.telemetry = Some(sink);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn elapsed(&self) -> f64 {
        self.ctx.elapsed
    }

    pub fn scenario(&self) -> &Scenario {
        &self.ctx.scenario
    }

    pub fn context(&self) -> &SimulationContext {
        &self.ctx
    }

    /// Steps issued since the current scenario was installed
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // =====================================================================================
    // Transitions
    // =====================================================================================

    /// Idle/Paused -> Running, issuing one step right away.
    /// Refuses to run with a non-positive time step. No-op when already Running.
    pub fn start(&mut self) -> SimResult<()> {
        if self.state == RunState::Running {
            return Ok(());
        }
        check_time_step(self.ctx.parameters.dt)?;

        log::info!("{} -> running at t = {}", self.state, self.ctx.elapsed);
        self.state = RunState::Running;
        self.advance()
    }

    pub fn resume(&mut self) -> SimResult<()> {
        self.start()
    }

    /// Running -> Paused; the pending tick is revoked
    pub fn pause(&mut self) {
        if self.state != RunState::Running {
            return;
        }
        self.cancel_pending();
        self.state = RunState::Paused;
        log::info!("paused at t = {} after {} steps", self.ctx.elapsed, self.steps);
    }

    /// Start/Pause button behaviour
    pub fn toggle(&mut self) -> SimResult<()> {
        match self.state {
            RunState::Running => {
                self.pause();
                Ok(())
            }
            RunState::Idle | RunState::Paused => self.start(),
        }
    }

    /// Replace the scenario wholesale. Any state -> Idle, elapsed time back to 0.
    ///
    /// A tracked body index that does not exist in the new scenario is dropped
    /// with a warning, so telemetry stays off until it is set again.
    pub fn load_scenario(&mut self, scenario: Scenario) {
        self.cancel_pending();

        if let Some(index) = self.ctx.tracked_body {
            if index >= scenario.len() {
                log::warn!(
                    "tracked body {index} not present in new scenario ({} bodies), telemetry disabled",
                    scenario.len()
                );
                self.ctx.tracked_body = None;
            }
        }

        self.ctx.scenario = scenario;
        self.ctx.elapsed = 0.0;
        self.steps = 0;
        self.state = RunState::Idle;

        if let Some(sink) = self.telemetry.as_mut() {
            sink.begin_run();
        }
        self.presentation.clear();
        self.announce();
        log::info!("scenario loaded with {} bodies", self.ctx.scenario.len());
    }

    pub fn set_tracked_body(&mut self, tracked_body: Option<usize>) -> SimResult<()> {
        self.ctx.set_tracked_body(tracked_body)
    }

    /// Change the physical step. Takes effect on the next step.
    pub fn set_time_step(&mut self, dt: f64) -> SimResult<()> {
        self.ctx.set_time_step(dt)
    }

    #[allow(non_snake_case)]
    pub fn set_gravity(&mut self, G: f64, epsilon: f64) -> SimResult<()> {
        self.ctx.set_gravity(G, epsilon)
    }

    /// Change the playback speed (clamped). Takes effect on the next scheduled tick.
    pub fn set_speed(&mut self, speed: f64) {
        self.ctx.engine.speed = self.ctx.engine.playback.clamp_speed(speed);
    }

    // =====================================================================================
    // Stepping
    // =====================================================================================

    /// Handle a tick delivered by the scheduler. Returns whether a step was issued;
    /// ticks that were cancelled, superseded, or arrive outside Running are ignored.
    pub fn on_tick(&mut self, tick: TickId) -> SimResult<bool> {
        if self.state != RunState::Running || self.pending != Some(tick) {
            log::debug!("ignoring stale tick {tick:?} while {}", self.state);
            return Ok(false);
        }
        self.pending = None;
        self.advance()?;
        Ok(true)
    }

    /// Drive the scheduler until it has nothing pending, the controller leaves
    /// Running, or `until` asks to stop (which pauses the controller)
    pub fn run<F>(&mut self, mut until: F) -> SimResult<()>
    where
        F: FnMut(&Self) -> bool,
    {
        while self.state == RunState::Running {
            if until(&*self) {
                self.pause();
                break;
            }
            match self.scheduler.next_tick() {
                Some(tick) => {
                    self.on_tick(tick)?;
                }
                None => break,
            }
        }
        Ok(())
    }

    /// Paced mode: start and run until `n` steps have been issued since the
    /// scenario was installed. `n == 0` leaves the controller untouched.
    pub fn run_steps(&mut self, n: u64) -> SimResult<()> {
        if n == 0 {
            return Ok(());
        }
        self.start()?;
        self.run(|c| c.steps() >= n)
    }

    /// Offline mode: `n` steps back to back, no scheduler, no state change
    pub fn run_batch(&mut self, n: u64) -> SimResult<()> {
        check_time_step(self.ctx.parameters.dt)?;
        for _ in 0..n {
            self.step_and_notify()?;
        }
        Ok(())
    }

    /// Step, then schedule the next tick if still Running.
    /// A failing step pauses the controller before the error is returned.
    fn advance(&mut self) -> SimResult<()> {
        if let Err(e) = self.step_and_notify() {
            log::error!("step failed at t = {}: {e}", self.ctx.elapsed);
            self.pause();
            return Err(e);
        }
        if self.state == RunState::Running {
            let delay = self.ctx.engine.tick_delay();
            self.pending = Some(self.scheduler.schedule_after(delay));
        }
        Ok(())
    }

    fn step_and_notify(&mut self) -> SimResult<()> {
        self.ctx.step()?;
        self.steps += 1;

        for (i, body) in self.ctx.scenario.bodies().iter().enumerate() {
            self.presentation.update_position(i, body);
        }
        self.presentation.update_time(self.ctx.elapsed);

        if let (Some(sink), Some(index)) = (self.telemetry.as_mut(), self.ctx.tracked_body) {
            if let Some(body) = self.ctx.scenario.get(index) {
                sink.record(self.ctx.elapsed, body)?;
            }
        }

        log::trace!("step {} done, t = {}", self.steps, self.ctx.elapsed);
        Ok(())
    }

    fn cancel_pending(&mut self) {
        if let Some(tick) = self.pending.take() {
            self.scheduler.cancel(tick);
        }
    }

    fn announce(&mut self) {
        for (i, body) in self.ctx.scenario.bodies().iter().enumerate() {
            self.presentation.create_image(i, body);
        }
    }
}
