//! Configuration types for loading simulation settings from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of the
//! settings the surrounding application exposes:
//!
//! - [`ParametersConfig`] – time step, gravitational constant, coincidence guard
//! - [`EngineConfig`]     – integrator choice and playback speed mapping
//! - [`IoConfig`]         – scenario/save/telemetry paths and the tracked body
//! - [`BodyConfig`]       – optional inline bodies used when no scenario file is given
//! - [`SimConfig`]        – top-level wrapper
//!
//! Every field has a default, so an empty document is a valid configuration.
//!
//! # YAML format
//!
//! ```yaml
//! parameters:
//!   dt: 1000.0              # seconds per step
//!   G: 6.67408e-11          # gravitational constant
//!   epsilon: 1.0e-3         # pairs closer than this exert no force
//!
//! engine:
//!   integrator: "euler"     # or "verlet"
//!   playback:
//!     speed: 50.0           # 0..=max_speed, higher means shorter delay
//!     max_speed: 100.0
//!     min_delay_ms: 1
//!     max_delay_ms: 100
//!
//! io:
//!   scenario_path: "solar_system.txt"
//!   save_path: "solar_system_out.txt"
//!   telemetry_path: "stats.txt"
//!   tracked_body: 1         # index into the scenario, omit to disable telemetry
//!
//! bodies:                   # only used when io.scenario_path is absent
//!   - kind: Star
//!     m: 1.98892e30
//!     x: [0.0, 0.0]
//!     v: [0.0, 0.0]
//!     radius: 30.0
//!     color: red
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{SimError, SimResult};
use crate::simulation::engine::{Engine, Playback};
use crate::simulation::params::Parameters;
use crate::simulation::states::BodyKind;

/// Which integrator the engine uses
/// `integrator: "euler"` or `integrator: "verlet"`
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IntegratorConfig {
    #[default]
    #[serde(rename = "euler")] // Semi-implicit Euler, velocity first then position
    SemiImplicitEuler,

    #[serde(rename = "verlet")] // Velocity Verlet, two force evaluations per step
    VelocityVerlet,
}

/// Numerical and physical parameters
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub dt: f64,      // time step size
    pub G: f64,       // gravitational constant
    pub epsilon: f64, // coincidence guard distance
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            dt: 1000.0,
            G: 6.67408e-11,
            epsilon: 1.0e-3,
        }
    }
}

/// Mapping from the playback speed slider to wall-clock delay between ticks
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PlaybackConfig {
    pub speed: f64,
    pub max_speed: f64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 50.0,
            max_speed: 100.0,
            min_delay_ms: 1,
            max_delay_ms: 100,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub integrator: IntegratorConfig,
    pub playback: PlaybackConfig,
}

/// Paths and telemetry target
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct IoConfig {
    pub scenario_path: Option<PathBuf>,
    pub save_path: Option<PathBuf>,
    pub telemetry_path: Option<PathBuf>,
    pub tracked_body: Option<usize>, // no implicit default: telemetry is off unless named
}

/// Initial state of one inline body
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub kind: BodyKind,
    pub m: f64,       // mass
    pub x: [f64; 2],  // position
    pub v: [f64; 2],  // velocity
    pub radius: f64,  // display radius
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "white".to_string()
}

/// Top-level configuration loaded from YAML
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SimConfig {
    pub parameters: ParametersConfig,
    pub engine: EngineConfig,
    pub io: IoConfig,
    pub bodies: Option<Vec<BodyConfig>>,
}

impl SimConfig {
    pub fn from_yaml_str(s: &str) -> SimResult<Self> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(s).map_err(|e| SimError::Config(e.to_string()))
    }

    pub fn from_yaml_file(path: &Path) -> SimResult<Self> {
        let mut text = String::new();
        BufReader::new(File::open(path)?).read_to_string(&mut text)?;
        Self::from_yaml_str(&text)
    }

    /// Validated runtime parameters
    pub fn parameters(&self) -> SimResult<Parameters> {
        let p = &self.parameters;
        Parameters::new(p.dt, p.G, p.epsilon)
    }

    /// Runtime engine settings
    pub fn engine(&self) -> SimResult<Engine> {
        let pb = &self.engine.playback;
        let playback = Playback::new(pb.min_delay_ms, pb.max_delay_ms, pb.max_speed)?;
        Ok(Engine {
            integrator: self.engine.integrator,
            playback,
            speed: playback.clamp_speed(pb.speed),
        })
    }
}
