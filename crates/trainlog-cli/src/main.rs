//! trainlog CLI
//!
//! Command-line helpers for inspecting logger backends and writing demo runs.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ndarray::{ArrayD, IxDyn};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use trainlog::prelude::*;

#[derive(Parser)]
#[command(name = "trainlog")]
#[command(version, about = "trainlog - experiment logging for training loops", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report which optional dependencies are compiled in
    Check,

    /// List available logger kinds
    List,

    /// Write a synthetic training run
    Demo {
        /// Experiment name (directory under --log-root)
        exp_name: String,

        /// Number of training steps to log
        #[arg(long, default_value = "100")]
        steps: u64,

        /// Root directory for experiments
        #[arg(long)]
        log_root: Option<PathBuf>,

        /// JSON logger config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also log a short video clip
        #[arg(long)]
        video: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check(),
        Commands::List => list_kinds(),
        Commands::Demo {
            exp_name,
            steps,
            log_root,
            config,
            video,
        } => demo(exp_name, steps, log_root, config, video)?,
    }

    Ok(())
}

fn check() {
    let status = |available: bool| if available { "available" } else { "missing" };

    println!("trainlog {}", trainlog::VERSION);
    println!("  tensorboard backend   {}", status(tensorboard_available()));
    println!("  video encoder         {}", status(default_video_probe()));
}

fn list_kinds() {
    println!("Available loggers:");
    println!();
    for kind in LoggerKind::ALL {
        println!("  {}", kind);
    }
}

fn demo(
    exp_name: String,
    steps: u64,
    log_root: Option<PathBuf>,
    config_path: Option<PathBuf>,
    video: bool,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => LoggerConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => LoggerConfig::default(),
    };
    config.exp_name = exp_name;
    if let Some(root) = log_root {
        config.log_root = Some(root);
    }

    tracing::info!(exp_name = %config.exp_name, steps, "Starting demo run");
    let mut logger = config.build().context("Failed to create logger")?;

    let mut hparams = Hparams::from_serialize(&config)?;
    hparams.insert("steps", steps);
    logger.log_hparams(&hparams)?;

    for step in 0..steps {
        let loss = (-(step as f64) / 25.0).exp();
        logger.log_scalar("train/loss", loss, Some(step))?;
    }

    if video {
        let clip = ArrayD::from_shape_fn(IxDyn(&[1, 8, 1, 16, 16]), |idx| {
            ((idx[1] + idx[3] + idx[4]) % 8) as f32 / 7.0
        });
        match logger.log_video("demo/clip", &clip, Some(steps), &VideoOptions::new()) {
            Ok(()) => {}
            Err(e) if e.is_missing_dependency() => tracing::warn!("Skipping video: {}", e),
            Err(e) => return Err(e.into()),
        }
    }

    logger.flush()?;
    println!("Wrote demo run to {}", logger.log_dir().display());
    println!("{}", logger);
    Ok(())
}
