pub mod error;
pub mod simulation;
pub mod configuration;
pub mod persistence;
pub mod visualization;

pub use error::{SimError, SimResult};

pub use simulation::states::{Body, BodyKind, NVec2};
pub use simulation::params::Parameters;
pub use simulation::forces::{Acceleration, AccelSet, NewtonianGravity};
pub use simulation::integrator::{integrate, euler_integrator, verlet_integrator};
pub use simulation::engine::{Engine, Playback};
pub use simulation::scenario::Scenario;
pub use simulation::scheduler::{Scheduler, TickId, ClockScheduler, ManualScheduler};
pub use simulation::controller::{Controller, RunState, SimulationContext};

pub use configuration::config::{SimConfig, ParametersConfig, EngineConfig, PlaybackConfig, IoConfig, BodyConfig, IntegratorConfig};

pub use persistence::scenario_file::{load_scenario, save_scenario, read_scenario, write_scenario, LoadReport, SkippedLine};
pub use persistence::telemetry::{TelemetrySink, FileTelemetry, MemoryTelemetry};

pub use visualization::presentation::{Presentation, LogPresentation, NullPresentation};
