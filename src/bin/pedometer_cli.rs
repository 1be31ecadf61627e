use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pedometer_core::analysis::GRAVITY;
use pedometer_core::engine::{ManualTimeSource, SimulatedSensor, StepTracker, TimeSource};
use pedometer_core::telemetry::TelemetrySnapshot;
use pedometer_core::testing::SignalBuilder;
use pedometer_core::{ActivityMode, AppConfig, DetectorConfig, DetectorStats};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "pedometer_cli",
    about = "Deterministic step-detection harness driven by a simulated accelerometer"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calibrate on a resting signal, then walk a synthetic gait and report steps
    Simulate {
        /// Activity profile applied after calibration
        #[arg(long, default_value = "default")]
        mode: String,
        /// Length of the gait segment
        #[arg(long, default_value_t = 5.0)]
        seconds: f64,
        /// Time between footfalls
        #[arg(long, default_value_t = 500)]
        cadence_ms: u64,
        /// Sample interval of the simulated sensor
        #[arg(long, default_value_t = 50)]
        interval_ms: u64,
        /// Peak acceleration above the resting baseline (m/s²)
        #[arg(long, default_value_t = 3.0)]
        amplitude: f64,
        /// Uniform jitter added to every sample (m/s²)
        #[arg(long, default_value_t = 0.0)]
        noise: f64,
        #[arg(long, default_value_t = 7)]
        seed: u64,
        /// Insert an idle pause halfway through the gait
        #[arg(long)]
        pause_ms: Option<u64>,
        /// JSON config file (falls back to $PEDOMETER_CONFIG, then the bundled asset)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the activity profile table
    Profiles,
}

#[derive(Serialize)]
struct SimulationReport {
    mode: ActivityMode,
    samples: usize,
    steps: usize,
    step_offsets_ms: Vec<u64>,
    stats: DetectorStats,
    telemetry: TelemetrySummary,
}

#[derive(Serialize)]
struct TelemetrySummary {
    total_events: u64,
    dropped_events: u64,
}

impl From<TelemetrySnapshot> for TelemetrySummary {
    fn from(snapshot: TelemetrySnapshot) -> Self {
        Self {
            total_events: snapshot.total_events,
            dropped_events: snapshot.dropped_events,
        }
    }
}

#[derive(Serialize)]
struct ProfileRow {
    mode: ActivityMode,
    #[serde(flatten)]
    config: DetectorConfig,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::INFO)
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            mode,
            seconds,
            cadence_ms,
            interval_ms,
            amplitude,
            noise,
            seed,
            pause_ms,
            config,
        } => {
            let config = config
                .map(AppConfig::load_from_file)
                .unwrap_or_else(AppConfig::load);
            let duration = Duration::try_from_secs_f64(seconds)
                .with_context(|| format!("invalid --seconds value {seconds}"))?;
            let params = GaitParams {
                mode: ActivityMode::from_name(&mode),
                duration,
                cadence: Duration::from_millis(cadence_ms.max(1)),
                interval: Duration::from_millis(interval_ms.max(1)),
                amplitude,
                noise,
                seed,
                pause: pause_ms.map(Duration::from_millis),
            };
            run_simulate(&config, &params)
        }
        Commands::Profiles => run_profiles(),
    }
}

struct GaitParams {
    mode: ActivityMode,
    duration: Duration,
    cadence: Duration,
    interval: Duration,
    amplitude: f64,
    noise: f64,
    seed: u64,
    pause: Option<Duration>,
}

fn run_simulate(config: &AppConfig, params: &GaitParams) -> Result<ExitCode> {
    let start = Instant::now();
    let clock = Arc::new(ManualTimeSource::new(start));
    let sensor = SimulatedSensor::new();

    let step_times = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&step_times);
    let step_clock = Arc::clone(&clock);
    let mut tracker = StepTracker::with_config(
        sensor.clone(),
        config,
        Box::new(move |_| {
            if let Ok(mut times) = recorder.lock() {
                times.push(step_clock.now());
            }
        }),
    )
    .with_time_source(clock.clone());

    tracker
        .start()
        .context("failed to start simulated sensor")?;

    let calibration = SignalBuilder::new(start, params.interval)
        .jitter(params.noise, params.seed)
        .calibration(config.calibration.sample_count);
    let gait_start = calibration.cursor();
    let mut samples = calibration.build();

    let half = params.duration / 2;
    let mut gait = SignalBuilder::new(gait_start, params.interval)
        .jitter(params.noise, params.seed.wrapping_add(1));
    gait = match params.pause {
        Some(pause) => gait
            .gait(half, params.cadence, params.amplitude, GRAVITY)
            .pause(pause)
            .gait(params.duration - half, params.cadence, params.amplitude, GRAVITY),
        None => gait.gait(params.duration, params.cadence, params.amplitude, GRAVITY),
    };
    let gait_samples = gait.build();

    // Calibration overwrites the threshold, so the profile goes on afterwards
    for sample in samples.drain(..) {
        clock.set(sample.timestamp);
        sensor.emit(sample);
    }
    tracker.set_activity_mode(params.mode);

    let sample_count = config.calibration.sample_count + gait_samples.len();
    for sample in gait_samples {
        clock.set(sample.timestamp);
        sensor.emit(sample);
    }

    let stats = tracker.stats();
    tracker.stop();

    let step_offsets_ms: Vec<u64> = step_times
        .lock()
        .map_err(|_| anyhow::anyhow!("step recorder poisoned"))?
        .iter()
        .map(|t| t.saturating_duration_since(gait_start).as_millis() as u64)
        .collect();

    let report = SimulationReport {
        mode: params.mode,
        samples: sample_count,
        steps: step_offsets_ms.len(),
        step_offsets_ms,
        stats,
        telemetry: tracker.telemetry().snapshot().into(),
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to serialize report")?
    );
    Ok(ExitCode::SUCCESS)
}

fn run_profiles() -> Result<ExitCode> {
    let rows: Vec<ProfileRow> = ActivityMode::ALL
        .iter()
        .map(|mode| ProfileRow {
            mode: *mode,
            config: mode.profile(),
        })
        .collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&rows).context("failed to serialize profiles")?
    );
    Ok(ExitCode::SUCCESS)
}
