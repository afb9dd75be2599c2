use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use sensorlab_config::SensorlabConfig;
use sensorlab_core::noise::noise_for_seed;
use sensorlab_core::preset::MAX_NOISE_LEVEL;
use sensorlab_core::{Control, SensorKind, SimulationEngine, ViewPreset};
use sensorlab_runtime::{drive_display, SimulationView};
use sensorlab_simulator::{Scenario, ScheduledControl, Simulator};
use sensorlab_telemetry::MetricsRecorder;

use crate::terminal::TerminalDisplay;

#[derive(Parser)]
#[command(name = "sensorlab", version, about)]
pub struct Cli {
    /// Configuration file, instead of config/sensorlab.yaml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List sensor kinds with their ranges and defaults
    Kinds,
    /// Run a live view and chart it in the terminal
    Watch(WatchArgs),
    /// Run headless, optionally replaying a scenario file
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[arg(long)]
    pub preset: Option<ViewPreset>,
    #[arg(long)]
    pub kind: Option<SensorKind>,
    /// Set point; constrained to the kind's range
    #[arg(long, allow_negative_numbers = true)]
    pub target: Option<f64>,
    /// Noise level in [0, 20]; lab view only
    #[arg(long)]
    pub noise: Option<f64>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// How long to keep the view mounted
    #[arg(long, default_value_t = 10)]
    pub seconds: u64,
    /// Print Prometheus metrics after the view unmounts
    #[arg(long, default_value_t = false)]
    pub print_metrics: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Scenario file to replay; if not provided, a free-running simulation is run.
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,
    /// Scheduler slots to run (used when no scenario is provided)
    #[arg(long, default_value_t = 100)]
    pub slots: u64,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub preset: Option<ViewPreset>,
    #[arg(long)]
    pub kind: Option<SensorKind>,
    /// Noise level in [0, 20]; lab view only
    #[arg(long)]
    pub noise: Option<f64>,
    /// Fail unless the run produces this state hash
    #[arg(long)]
    pub validate_hash: Option<String>,
}

pub fn list_kinds() -> anyhow::Result<()> {
    println!(
        "{:<12} {:<16} {:>8} {:>8} {:>8}  {}",
        "id", "name", "min", "max", "default", "unit"
    );
    for kind in SensorKind::ALL {
        let p = kind.profile();
        println!(
            "{:<12} {:<16} {:>8} {:>8} {:>8}  {}",
            kind, p.name, p.min, p.max, p.default_value, p.unit
        );
    }
    let demo = ViewPreset::Demo.profile(SensorKind::Temperature);
    println!(
        "\ndemo view: {} on [{}, {}]{}, window {}, every {:?}",
        demo.name,
        demo.min,
        demo.max,
        demo.unit,
        ViewPreset::Demo.window(),
        ViewPreset::Demo.tick_interval()
    );
    Ok(())
}

/// Flags and config folded into what a view is mounted with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub preset: ViewPreset,
    pub kind: SensorKind,
    pub seed: Option<u64>,
    /// Overrides the preset's starting noise when set.
    pub noise_level: Option<f64>,
    pub target: Option<f64>,
}

pub fn view_settings(args: &WatchArgs, config: &SensorlabConfig) -> ViewSettings {
    let preset = args.preset.unwrap_or(config.simulation.preset);
    let kind = args.kind.unwrap_or(config.simulation.kind);
    let profile = preset.profile(kind);
    ViewSettings {
        preset,
        kind,
        seed: args.seed.or(config.simulation.seed),
        noise_level: noise_level(preset, args.noise, config),
        target: args
            .target
            .map(|target| constrain("target", target, profile.min, profile.max)),
    }
}

/// Scenario for `simulate`: the given file, or a free run shaped by flags and config.
pub fn headless_scenario(
    args: &SimulateArgs,
    config: &SensorlabConfig,
) -> anyhow::Result<Scenario> {
    if let Some(path) = &args.scenario {
        return Scenario::load_from_path(path)
            .with_context(|| format!("loading scenario {}", path.display()));
    }

    let preset = args.preset.unwrap_or(config.simulation.preset);
    let mut scenario = Scenario::free_running(
        args.seed.or(config.simulation.seed).unwrap_or_default(),
        preset,
        args.kind.unwrap_or(config.simulation.kind),
        args.slots,
    );
    if let Some(level) = noise_level(preset, args.noise, config) {
        scenario.actions.insert(
            0,
            ScheduledControl {
                at_slot: 0,
                control: Control::SetNoiseLevel(level),
            },
        );
    }
    Ok(scenario)
}

pub async fn run_watch(args: WatchArgs, config: &SensorlabConfig) -> anyhow::Result<()> {
    let ViewSettings {
        preset,
        kind,
        seed,
        noise_level,
        target,
    } = view_settings(&args, config);

    let mut engine = SimulationEngine::new(preset, noise_for_seed(seed));
    if kind != engine.kind() {
        engine.select_kind(kind)?;
    }
    let profile = engine.profile();

    let metrics = if config.telemetry.metrics {
        Some(Arc::new(MetricsRecorder::new()?))
    } else {
        None
    };
    let mut view = SimulationView::mount(engine, metrics.clone())?;

    if let Some(level) = noise_level {
        view.set_noise_level(level);
    }
    if let Some(target) = target {
        view.set_target(target);
    }

    let receiver = view.subscribe();
    let display = tokio::spawn(async move {
        let mut terminal = TerminalDisplay::new(std::io::stdout(), profile.name);
        drive_display(receiver, &mut terminal).await;
        terminal.finish();
    });

    view.start();
    info!(%preset, %kind, seconds = args.seconds, "Watching simulation");
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(args.seconds)) => {}
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }

    view.unmount().await?;
    display.await.context("display task failed")?;

    if let (true, Some(metrics)) = (args.print_metrics, metrics) {
        print!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

pub fn run_simulate(args: SimulateArgs, config: &SensorlabConfig) -> anyhow::Result<()> {
    let scenario = headless_scenario(&args, config)?;
    let report = Simulator::replay(&scenario)?;
    print!("{}", serde_yaml::to_string(&report)?);

    if let Some(expected) = args.validate_hash {
        if !expected.eq_ignore_ascii_case(&report.state_hash) {
            bail!(
                "state hash mismatch: expected {expected}, got {}",
                report.state_hash
            );
        }
        info!("State hash validated");
    }
    Ok(())
}

/// Noise flag first, then config, for presets that have a noise slider.
/// Values the slider could not produce are pulled back into range.
fn noise_level(preset: ViewPreset, flag: Option<f64>, config: &SensorlabConfig) -> Option<f64> {
    if !preset.allows_noise_adjustment() {
        if flag.is_some() {
            warn!(%preset, "View runs at a fixed noise level, ignoring --noise");
        }
        return None;
    }
    flag.or(config.simulation.noise_override(preset))
        .map(|level| constrain("noise", level, 0.0, MAX_NOISE_LEVEL))
}

fn constrain(name: &str, value: f64, min: f64, max: f64) -> f64 {
    let constrained = value.clamp(min, max);
    if constrained != value {
        warn!(name, value, min, max, "Value outside control range, constrained");
    }
    constrained
}
