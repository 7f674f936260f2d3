//! Error taxonomy for the simulation core
//!
//! Parse-time problems (`UnknownObjectKind`, `Parse`, `InvalidBody` while loading) are
//! recoverable per line; the scenario loader reports them and keeps going.
//! Physics-time violations (`InvalidTimeStep`, `InvalidBody` in programmatic use) are
//! returned to the caller of the operation that triggered them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Mass or display radius not strictly positive
    #[error("invalid body: {field} must be > 0, got {value}")]
    InvalidBody { field: &'static str, value: f64 },

    /// Time step not strictly positive
    #[error("invalid time step: dt must be > 0, got {0}")]
    InvalidTimeStep(f64),

    /// Leading token of a scenario line is neither `Star` nor `Planet`
    #[error("unknown object kind `{0}`")]
    UnknownObjectKind(String),

    /// Missing or malformed field on a scenario line
    #[error("parse error in field `{field}`: {reason}")]
    Parse { field: &'static str, reason: String },

    /// Telemetry target does not exist in the installed scenario
    #[error("tracked body {index} out of range for scenario with {len} bodies")]
    UnknownTrackedBody { index: usize, len: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
