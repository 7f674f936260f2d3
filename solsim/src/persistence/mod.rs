pub mod scenario_file;
pub mod telemetry;
