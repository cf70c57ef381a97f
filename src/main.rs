//! Flick gesture replay tool
//!
//! Feeds a recorded input script through the gesture recognizers and prints
//! every signal that fires, for tuning area and threshold settings without a
//! device.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flick_gestures::script::{Replay, Script};
use flick_gestures::GestureConfig;

#[derive(Parser, Debug)]
#[command(name = "flick-gestures")]
#[command(about = "Replay input scripts through the Flick gesture recognizer", long_about = None)]
struct Args {
    /// Input script (TOML)
    script: PathBuf,

    /// Gesture config file (defaults to ~/.config/flick/gestures.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print one JSON object per signal
    #[arg(long)]
    json: bool,

    /// Enable verbose debug output
    #[arg(short, long)]
    debug: bool,

    /// Also write logs to a daily rotated file in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Quiet by default, verbose with --debug
    let default_filter = if args.debug {
        "debug,flick_gestures=trace"
    } else {
        "warn,flick_gestures=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (file_layer, _guard) = match &args.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let file_appender = rolling::daily(dir, "gestures.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (
                Some(fmt::layer().with_writer(non_blocking).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .init();

    let config = match &args.config {
        Some(path) => GestureConfig::from_file(path)
            .with_context(|| format!("loading gesture config {}", path.display()))?,
        None => GestureConfig::load(),
    };

    let script = Script::from_file(&args.script)
        .with_context(|| format!("loading script {}", args.script.display()))?;
    info!(
        script = %args.script.display(),
        surfaces = script.surfaces.len(),
        steps = script.steps.len(),
        "Replaying"
    );

    let mut replay = Replay::new(&script, config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (index, step) in script.steps.iter().enumerate() {
        for event in replay.apply(index, step)? {
            if args.json {
                serde_json::to_writer(&mut out, &event)?;
                writeln!(out)?;
            } else {
                let d = &event.detail;
                writeln!(
                    out,
                    "[{}] {} {} axis={:?} direction={:?} movement=({}, {}) distance=({}, {})",
                    event.step,
                    event.surface,
                    event.event,
                    d.axis,
                    d.direction,
                    d.movement_x,
                    d.movement_y,
                    d.distance_x,
                    d.distance_y,
                )?;
            }
        }
    }

    Ok(())
}
