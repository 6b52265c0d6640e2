//! # trainlog
//!
//! Backend-agnostic experiment logging for training loops.
//!
//! ## Overview
//!
//! trainlog provides:
//! - The `Logger` trait, a uniform contract for scalars, videos and hyperparameters
//! - `TensorboardLogger`, an adapter over any `ExperimentBackend`
//! - `EventWriter`, a TensorBoard event-file session - requires `tensorboard` feature
//! - GIF video summaries - requires `video` feature
//!
//! ## Features
//!
//! - `tensorboard` - Built-in event-file backend (default)
//! - `video` - GIF encoding for `log_video` (default)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trainlog::prelude::*;
//!
//! let mut logger = TensorboardLogger::new("runs/cartpole")?;
//! logger.log_scalar("loss", 0.5, Some(10))?;
//! logger.log_hparams(&Hparams::from_serialize(&config)?)?;
//! ```

pub mod config;
#[cfg(feature = "tensorboard")]
pub mod event;
pub mod log;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::LoggerConfig;
    #[cfg(feature = "tensorboard")]
    pub use crate::event::EventWriter;
    pub use crate::log::{
        default_video_probe, generate_exp_name, get_logger, tensorboard_available, EventFileBackend,
        Experiment, ExperimentBackend, Hparams, Logger, LoggerKind, TensorboardLogger, VideoOptions,
    };
    pub use crate::{LoggerError, Result};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Boxed error raised by a backend session.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for the library
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("{backend} does not implement {operation}")]
    NotImplemented {
        backend: &'static str,
        operation: &'static str,
    },

    #[error("{dependency} not found, {purpose}")]
    MissingOptionalDependency {
        dependency: &'static str,
        purpose: &'static str,
    },

    #[error("Backend call failed: {0}")]
    Backend(#[source] BoxError),

    #[error("Invalid video: {0}")]
    InvalidVideo(String),

    #[error("Invalid step: {0}")]
    InvalidStep(String),

    #[error("Invalid hyperparameters: {0}")]
    InvalidHparams(String),

    #[error("Unknown logger kind: {0}")]
    UnknownLogger(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl LoggerError {
    /// Wrap an arbitrary backend failure, keeping it as the error source.
    pub fn backend(err: impl Into<BoxError>) -> Self {
        Self::Backend(err.into())
    }

    /// True for the missing-optional-dependency kind.
    pub fn is_missing_dependency(&self) -> bool {
        matches!(self, Self::MissingOptionalDependency { .. })
    }
}

pub type Result<T> = std::result::Result<T, LoggerError>;
