//! Experiment logging.
//!
//! Provides:
//! - `Logger` trait, the contract training loops log through
//! - `Experiment` / `ExperimentBackend` traits for backend sessions
//! - `TensorboardLogger` adapter with a lazily probed video encoder
//! - `LoggerKind` and `get_logger` for picking a backend at construction

mod hparams;
mod logger;
mod registry;
mod tensorboard;
mod video;

pub use hparams::Hparams;
pub use logger::{Experiment, ExperimentBackend, Logger};
pub use registry::{generate_exp_name, get_logger, LoggerKind};
pub use tensorboard::{
    tensorboard_available, EventFileBackend, TensorboardLogger, HPARAMS_TAG, TENSORBOARD_BACKEND,
};
pub use video::{default_video_probe, VideoCapability, VideoOptions, VideoProbe, VIDEO_ENCODER};
