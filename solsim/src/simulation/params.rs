//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - integration step size `dt`,
//! - gravitational constant `G`,
//! - coincidence guard distance `epsilon`

use crate::error::{SimError, SimResult};

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub dt: f64, // step size
    pub G: f64, // gravitational constant
    pub epsilon: f64, // pairs closer than this exert no force on each other
}

impl Parameters {
    /// Build parameters, checking `dt > 0`, finite `G` and `epsilon > 0`
    #[allow(non_snake_case)]
    pub fn new(dt: f64, G: f64, epsilon: f64) -> SimResult<Self> {
        check_time_step(dt)?;
        if !G.is_finite() {
            return Err(SimError::Config(format!("G must be finite, got {G}")));
        }
        if !(epsilon > 0.0) {
            return Err(SimError::Config(format!("epsilon must be > 0, got {epsilon}")));
        }
        Ok(Self { dt, G, epsilon })
    }
}

/// Reject any step that is not strictly positive (NaN included)
pub fn check_time_step(dt: f64) -> SimResult<()> {
    if dt > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidTimeStep(dt))
    }
}
