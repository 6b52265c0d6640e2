//! Logger configuration.

use crate::log::{EventFileBackend, Logger, LoggerKind, TensorboardLogger};
use crate::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for building a logger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Backend to log to
    pub kind: LoggerKind,
    /// Experiment name; also the experiment directory under `log_root`
    pub exp_name: String,
    /// Directory experiments are created in (current directory if unset)
    pub log_root: Option<PathBuf>,
    /// Suffix appended to event file names
    pub filename_suffix: String,
    /// Frame rate for videos logged without an `fps` option
    pub default_fps: u32,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            kind: LoggerKind::default(),
            exp_name: "default".to_string(),
            log_root: None,
            filename_suffix: String::new(),
            default_fps: 4,
        }
    }
}

impl LoggerConfig {
    /// Create a new config for the given experiment.
    pub fn new(exp_name: impl Into<String>) -> Self {
        Self {
            exp_name: exp_name.into(),
            ..Default::default()
        }
    }

    /// Set the backend kind.
    pub fn with_kind(mut self, kind: LoggerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the root directory.
    pub fn with_log_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.log_root = Some(root.into());
        self
    }

    /// Set the event file suffix.
    pub fn with_filename_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.filename_suffix = suffix.into();
        self
    }

    /// Set the default video frame rate.
    pub fn with_default_fps(mut self, fps: u32) -> Self {
        self.default_fps = fps;
        self
    }

    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| LoggerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.exp_name.is_empty() {
            return Err(LoggerError::Config("exp_name must not be empty".into()));
        }
        if self.default_fps == 0 {
            return Err(LoggerError::Config("default_fps must be positive".into()));
        }
        Ok(())
    }

    /// Directory the experiment will be written to.
    pub fn experiment_dir(&self) -> PathBuf {
        self.backend().log_dir_for(&self.exp_name)
    }

    fn backend(&self) -> EventFileBackend {
        let backend = EventFileBackend::new()
            .filename_suffix(self.filename_suffix.clone())
            .default_fps(self.default_fps);
        match &self.log_root {
            Some(root) => backend.root(root.clone()),
            None => backend,
        }
    }

    /// Build the configured logger.
    pub fn build(&self) -> Result<Box<dyn Logger>> {
        self.validate()?;
        match self.kind {
            LoggerKind::Tensorboard => Ok(Box::new(TensorboardLogger::with_backend(
                self.exp_name.clone(),
                self.backend(),
            )?)),
        }
    }
}
