use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mocap_rig::config::Config;
use mocap_rig::document;
use mocap_rig::pipeline::{self, TrackFailure};
use mocap_rig::skeleton::Skeleton;

const CONFIG_PATH: &str = "config.toml";

#[derive(Parser)]
#[command(name = "mocap-rig")]
#[command(version = env!("MOCAP_RIG_BUILD"))]
#[command(about = "Smooth tracked pose landmarks and derive bone rotations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    overrides: Overrides,

    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = CONFIG_PATH)]
    config: PathBuf,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Values that replace the configuration file's
#[derive(Args)]
struct Overrides {
    /// Video frame rate in Hz
    #[arg(long, global = true)]
    frame_rate: Option<f64>,

    /// Filter cutoff at rest in Hz
    #[arg(long, global = true)]
    min_cutoff: Option<f64>,

    /// Filter speed coefficient
    #[arg(long, global = true)]
    beta: Option<f64>,

    /// Process tracks one after another
    #[arg(long, global = true)]
    sequential: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Smooth a landmark document
    Smooth {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Bone rotations from an already smoothed landmark document
    Rotate {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Smooth, then compute rotations
    Run {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        smoothed: PathBuf,
        #[arg(long)]
        rotations: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_config(path: &Path, overrides: &Overrides) -> Result<Config> {
    let mut config = Config::load_or_default(path)?;
    if let Some(frame_rate) = overrides.frame_rate {
        config.filter.frame_rate = frame_rate;
    }
    if let Some(min_cutoff) = overrides.min_cutoff {
        config.filter.min_cutoff = min_cutoff;
    }
    if let Some(beta) = overrides.beta {
        config.filter.beta = beta;
    }
    if overrides.sequential {
        config.run.parallel = false;
    }
    config
        .validate()
        .with_context(|| format!("invalid configuration ({})", path.display()))?;
    Ok(config)
}

fn report_failures(failures: &[TrackFailure]) {
    if failures.is_empty() {
        return;
    }
    eprintln!("{} track(s) dropped:", failures.len());
    for failure in failures {
        eprintln!("  {}: {}", failure.track, failure.error);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli.config, &cli.overrides)?;
    tracing::debug!(?config, "configuration");

    match cli.command {
        Commands::Smooth { input, output } => {
            let tracks = document::load_tracks(&input)?;
            let outcome = pipeline::smooth_tracks(&tracks, &config.filter, config.run.parallel)?;
            document::save_tracks(&output, &outcome.tracks)?;
            report_failures(&outcome.failures);
        }
        Commands::Rotate { input, output } => {
            let tracks = document::load_tracks(&input)?;
            let skeleton = Skeleton::mediapipe();
            let rotations = pipeline::estimate_tracks(
                &tracks,
                &skeleton,
                config.rotation.expected_pose_landmarks,
                config.run.parallel,
            );
            document::save_rotations(&output, &rotations)?;
        }
        Commands::Run {
            input,
            smoothed,
            rotations,
        } => {
            let tracks = document::load_tracks(&input)?;
            let report = pipeline::run(&tracks, &config)?;
            document::save_tracks(&smoothed, &report.smoothed)?;
            document::save_rotations(&rotations, &report.rotations)?;
            println!(
                "{} track(s) in, {} smoothed, {} failed, {} rotation frame(s)",
                tracks.len(),
                report.smoothed.len(),
                report.failures.len(),
                report.rotation_frames()
            );
            report_failures(&report.failures);
        }
    }

    Ok(())
}
