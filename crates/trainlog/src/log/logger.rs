//! Logger contract and backend session traits.

use super::{Hparams, VideoOptions};
use crate::{LoggerError, Result};
use ndarray::ArrayD;
use std::fmt;
use std::path::Path;

/// An open experiment on a logging backend.
///
/// This is the surface a backend SDK exposes to the adapters: one session per
/// experiment, owned exclusively by one logger.
pub trait Experiment: Send {
    /// Short backend identifier used in error messages.
    fn backend_name(&self) -> &'static str;

    /// Location the session writes to.
    fn log_dir(&self) -> &Path;

    /// Record a scalar. `None` lets the backend pick the step.
    fn add_scalar(&mut self, tag: &str, value: f64, step: Option<u64>) -> Result<()>;

    /// Record a video tensor with backend-specific options.
    fn add_video(
        &mut self,
        _tag: &str,
        _video: &ArrayD<f32>,
        _step: Option<u64>,
        _options: &VideoOptions,
    ) -> Result<()> {
        Err(LoggerError::NotImplemented {
            backend: self.backend_name(),
            operation: "add_video",
        })
    }

    /// Record a text blob.
    fn add_text(&mut self, _tag: &str, _text: &str, _step: Option<u64>) -> Result<()> {
        Err(LoggerError::NotImplemented {
            backend: self.backend_name(),
            operation: "add_text",
        })
    }

    /// Push pending writes to the backend.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// The session's own human-readable representation.
    fn describe(&self) -> String;
}

impl<E: Experiment + ?Sized> Experiment for Box<E> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn log_dir(&self) -> &Path {
        (**self).log_dir()
    }

    fn add_scalar(&mut self, tag: &str, value: f64, step: Option<u64>) -> Result<()> {
        (**self).add_scalar(tag, value, step)
    }

    fn add_video(
        &mut self,
        tag: &str,
        video: &ArrayD<f32>,
        step: Option<u64>,
        options: &VideoOptions,
    ) -> Result<()> {
        (**self).add_video(tag, video, step, options)
    }

    fn add_text(&mut self, tag: &str, text: &str, step: Option<u64>) -> Result<()> {
        (**self).add_text(tag, text, step)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Factory for experiment sessions. One implementation per backend kind.
pub trait ExperimentBackend {
    type Session: Experiment;

    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Open a session rooted at `exp_name`.
    ///
    /// Fails with [`LoggerError::MissingOptionalDependency`] when the backend
    /// SDK is not available in this build.
    fn open(&self, exp_name: &str) -> Result<Self::Session>;
}

/// Trait for logging training runs to an experiment-tracking backend.
///
/// Implementors open their backend session when constructed and keep it for
/// their whole lifetime.
pub trait Logger: Send {
    /// Experiment name given at construction.
    fn exp_name(&self) -> &str;

    /// Log location reported by the backend session.
    fn log_dir(&self) -> &Path;

    /// Log a scalar value (e.g. reward, loss).
    fn log_scalar(&mut self, name: &str, value: f64, step: Option<u64>) -> Result<()>;

    /// Log a video tensor of shape `(N, T, C, H, W)`.
    fn log_video(
        &mut self,
        name: &str,
        video: &ArrayD<f32>,
        step: Option<u64>,
        options: &VideoOptions,
    ) -> Result<()>;

    /// Log the hyperparameters of the experiment.
    fn log_hparams(&mut self, cfg: &Hparams) -> Result<()>;

    /// Stable human-readable identifier for the logger.
    fn render(&self) -> String;

    /// Flush the backend session.
    fn flush(&mut self) -> Result<()>;
}

impl fmt::Display for dyn Logger + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
