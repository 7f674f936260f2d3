//! High-level runtime engine settings
//!
//! Selects the integrator and maps the playback speed to the wall-clock
//! delay between scheduled ticks. Speed never changes the physical step size.

use std::time::Duration;

use crate::configuration::config::IntegratorConfig;
use crate::error::{SimError, SimResult};

#[derive(Debug, Clone)]
pub struct Engine {
    pub integrator: IntegratorConfig, // euler or verlet
    pub playback: Playback, // speed -> delay mapping
    pub speed: f64, // current speed, always inside playback's range
}

impl Default for Engine {
    fn default() -> Self {
        let playback = Playback::default();
        Self {
            integrator: IntegratorConfig::default(),
            speed: playback.max_speed / 2.0,
            playback,
        }
    }
}

impl Engine {
    /// Delay before the next tick at the current speed
    pub fn tick_delay(&self) -> Duration {
        self.playback.delay_for(self.speed)
    }
}

/// Linear speed -> delay mapping clamped to `[min_delay, max_delay]`.
///
/// Speed 0 gives `max_delay`, `max_speed` gives `min_delay`, and the delay
/// strictly decreases in between. [`Playback::new`] enforces `min_delay < max_delay`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub max_speed: f64,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(100),
            max_speed: 100.0,
        }
    }
}

impl Playback {
    pub fn new(min_delay_ms: u64, max_delay_ms: u64, max_speed: f64) -> SimResult<Self> {
        if min_delay_ms >= max_delay_ms {
            return Err(SimError::Config(format!(
                "min_delay_ms ({min_delay_ms}) must be below max_delay_ms ({max_delay_ms})"
            )));
        }
        if !(max_speed > 0.0) || !max_speed.is_finite() {
            return Err(SimError::Config(format!("max_speed must be > 0, got {max_speed}")));
        }
        Ok(Self {
            min_delay: Duration::from_millis(min_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
            max_speed,
        })
    }

    /// Clamp into `[0, max_speed]`; NaN becomes 0
    pub fn clamp_speed(&self, speed: f64) -> f64 {
        if speed.is_nan() {
            0.0
        } else {
            speed.clamp(0.0, self.max_speed)
        }
    }

    pub fn delay_for(&self, speed: f64) -> Duration {
        let frac = self.clamp_speed(speed) / self.max_speed;
        let span = (self.max_delay - self.min_delay).as_nanos() as f64;
        self.max_delay - Duration::from_nanos((span * frac).round() as u64)
    }
}
