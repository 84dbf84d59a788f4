//! Parking Lot Occupancy Detection CLI
//!
//! Runs the detection loop against a mock camera and prints the occupancy
//! vector, for demonstrating and smoke-testing the pipeline without
//! hardware attached.

use clap::Parser;
use lotwatch::{
    capture::{load_reference, Camera, FileConfig, Frame, MockCamera},
    detection::{FrameDifferencer, SpotEvaluator},
    layout::LotLayout,
    pipeline::{DetectionPipeline, LogSink},
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "lotwatch", version, about = "Parking lot occupancy detection")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a TOML lot layout (defaults to the builtin table).
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Path to the empty-lot reference image.
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Number of detection cycles to run.
    #[arg(long)]
    cycles: Option<u32>,

    /// Run until interrupted instead of a fixed cycle count.
    #[arg(long)]
    continuous: bool,

    /// Delay between cycles in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    info!("Lotwatch v{}", lotwatch::VERSION);

    let config = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };

    let layout = match &cli.layout {
        Some(path) => match LotLayout::from_file(path) {
            Ok(layout) => layout,
            Err(e) => {
                eprintln!("Failed to load layout {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LotLayout::builtin(),
    };

    // The region table and the camera resolution are contractually
    // coupled; refuse to start the loop on a mismatch.
    if let Err(e) = layout.validate(config.capture.width, config.capture.height) {
        eprintln!("Lot layout rejected: {}", e);
        std::process::exit(1);
    }
    info!(spots = layout.spot_count(), "Lot layout validated");

    let reference = match &cli.reference {
        Some(path) => {
            match load_reference(path, config.capture.width, config.capture.height) {
                Ok(frame) => frame,
                Err(e) => {
                    eprintln!("Failed to load reference image: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            info!("No reference image supplied; using a synthetic flat reference");
            Frame::flat(128, config.capture.width, config.capture.height, 0)
        }
    };

    let mut camera = MockCamera::new();
    if let Err(e) = camera.open(&config.capture) {
        eprintln!("Failed to open camera: {}", e);
        std::process::exit(1);
    }

    let mut pipeline = DetectionPipeline::new(
        camera,
        FrameDifferencer::new(reference, &config.detection),
        SpotEvaluator::new(&layout, &config.detection),
        LogSink,
    );

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        if let Err(e) = ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        }) {
            eprintln!("Failed to install Ctrl-C handler: {}", e);
            std::process::exit(1);
        }
    }

    let max_cycles = if cli.continuous || config.output.continuous {
        None
    } else {
        Some(u64::from(cli.cycles.unwrap_or(config.output.cycle_count)))
    };
    let interval = Duration::from_millis(cli.interval_ms.unwrap_or(config.output.interval_ms));

    info!(?max_cycles, interval_ms = interval.as_millis() as u64, "Starting detection loop");

    if let Err(e) = pipeline.run(max_cycles, interval, &running) {
        eprintln!("Detection loop aborted: {}", e);
        std::process::exit(1);
    }

    match pipeline.last_state() {
        Some(state) => {
            println!("{}", state.code_string());
            info!(
                cycles = pipeline.cycles_completed(),
                empty = state.empty_count(),
                "Detection finished"
            );
        }
        None => {
            eprintln!("No occupancy vector was produced");
            std::process::exit(1);
        }
    }
}
