use solsim::{load_scenario, save_scenario, Scenario, SimConfig};
use solsim::{ClockScheduler, Controller, ManualScheduler, Scheduler, SimulationContext};
use solsim::{FileTelemetry, LogPresentation};

use anyhow::{Context, Result};
use clap::Parser;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(about = "Headless star/planet gravity simulator")]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scenario text file (overrides io.scenario_path)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Number of steps to run
    #[arg(short = 'n', long, default_value_t = 1000)]
    steps: u64,

    /// Pace steps in wall-clock time using the playback speed
    #[arg(long)]
    realtime: bool,

    /// Playback speed, overrides the configured one
    #[arg(long)]
    speed: Option<f64>,

    /// Save the final state here (overrides io.save_path)
    #[arg(long)]
    save: Option<PathBuf>,

    /// Telemetry log (overrides io.telemetry_path)
    #[arg(long)]
    telemetry: Option<PathBuf>,

    /// Index of the body to record in the telemetry log (overrides io.tracked_body)
    #[arg(long)]
    track: Option<usize>,
}

// load here to keep main clean
fn load_config(args: &Args) -> Result<SimConfig> {
    let mut cfg = match &args.config {
        Some(path) => SimConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SimConfig::default(),
    };

    if let Some(path) = &args.scenario {
        cfg.io.scenario_path = Some(path.clone());
    }
    if let Some(path) = &args.save {
        cfg.io.save_path = Some(path.clone());
    }
    if let Some(path) = &args.telemetry {
        cfg.io.telemetry_path = Some(path.clone());
    }
    if args.track.is_some() {
        cfg.io.tracked_body = args.track;
    }
    Ok(cfg)
}

fn initial_scenario(cfg: &SimConfig) -> Result<Scenario> {
    if let Some(path) = &cfg.io.scenario_path {
        // skipped lines are already logged by the loader
        let report = load_scenario(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        return Ok(report.scenario);
    }
    match &cfg.bodies {
        Some(bodies) => Ok(Scenario::build_scenario(bodies).context("invalid inline body")?),
        None => Ok(Scenario::sun_earth()),
    }
}

fn drive<S: Scheduler>(
    ctx: SimulationContext,
    scheduler: S,
    view: Rc<RefCell<LogPresentation>>,
    telemetry: Option<FileTelemetry>,
    args: &Args,
) -> Result<(Scenario, f64)> {
    let mut controller = Controller::new(ctx, scheduler, Box::new(view));
    if let Some(sink) = telemetry {
        controller = controller.with_telemetry(Box::new(sink));
    }
    if let Some(speed) = args.speed {
        controller.set_speed(speed);
    }

    if args.realtime {
        controller.run_steps(args.steps)?;
    } else {
        controller.run_batch(args.steps)?;
    }
    Ok((controller.scenario().clone(), controller.elapsed()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = load_config(&args)?;

    let scenario = initial_scenario(&cfg)?;
    let parameters = cfg.parameters()?;
    let engine = cfg.engine()?;

    let view = Rc::new(RefCell::new(LogPresentation::new(800.0, 800.0)));
    view.borrow_mut().fit(&scenario);

    let ctx = SimulationContext::new(scenario, parameters, engine, cfg.io.tracked_body)?;
    let telemetry = cfg.io.telemetry_path.as_ref().map(FileTelemetry::new);

    log::info!("Modelling started!");
    let (scenario, elapsed) = if args.realtime {
        drive(ctx, ClockScheduler::new(), view, telemetry, &args)?
    } else {
        drive(ctx, ManualScheduler::new(), view, telemetry, &args)?
    };
    log::info!("Modelling finished! {elapsed:.1} seconds gone");

    if let Some(path) = &cfg.io.save_path {
        save_scenario(path, &scenario)
            .with_context(|| format!("failed to save scenario {}", path.display()))?;
        log::info!("saved {} bodies to {}", scenario.len(), path.display());
    }

    Ok(())
}
