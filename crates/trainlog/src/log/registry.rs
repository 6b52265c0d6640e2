//! Logger kinds selectable at construction time.

use super::{Logger, TensorboardLogger};
use crate::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Available logger backends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerKind {
    #[default]
    Tensorboard,
}

impl LoggerKind {
    pub const ALL: &'static [LoggerKind] = &[LoggerKind::Tensorboard];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoggerKind::Tensorboard => "tensorboard",
        }
    }
}

impl fmt::Display for LoggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoggerKind {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tensorboard" | "tb" => Ok(LoggerKind::Tensorboard),
            other => Err(LoggerError::UnknownLogger(other.to_string())),
        }
    }
}

/// Create a logger of the given kind with its default backend.
pub fn get_logger(kind: LoggerKind, exp_name: &str) -> Result<Box<dyn Logger>> {
    match kind {
        LoggerKind::Tensorboard => Ok(Box::new(TensorboardLogger::new(exp_name)?)),
    }
}

/// Build a unique experiment name: `{model_name}_{experiment_name}_{unix_secs}`.
pub fn generate_exp_name(model_name: &str, experiment_name: &str) -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{}_{}_{}", model_name, experiment_name, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("tensorboard".parse::<LoggerKind>().unwrap(), LoggerKind::Tensorboard);
        assert_eq!("TB".parse::<LoggerKind>().unwrap(), LoggerKind::Tensorboard);

        let err = "wandb".parse::<LoggerKind>().unwrap_err();
        assert!(matches!(err, LoggerError::UnknownLogger(ref k) if k == "wandb"));
    }

    #[test]
    fn test_kind_display_roundtrips() {
        for kind in LoggerKind::ALL {
            assert_eq!(kind.to_string().parse::<LoggerKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_kind_serde_lowercase() {
        let json = serde_json::to_string(&LoggerKind::Tensorboard).unwrap();
        assert_eq!(json, "\"tensorboard\"");
    }

    #[test]
    fn test_generate_exp_name() {
        let name = generate_exp_name("ppo", "cartpole");
        let secs = name.strip_prefix("ppo_cartpole_").unwrap();
        assert!(secs.parse::<u64>().unwrap() > 0);
    }

    #[cfg(feature = "tensorboard")]
    #[test]
    fn test_get_logger_tensorboard() {
        let dir = tempfile::tempdir().unwrap();
        let exp = dir.path().join("run1");
        let logger = get_logger(LoggerKind::Tensorboard, exp.to_str().unwrap()).unwrap();
        assert_eq!(logger.log_dir(), exp.as_path());
        assert!(exp.is_dir());
    }

    #[cfg(not(feature = "tensorboard"))]
    #[test]
    fn test_get_logger_without_backend() {
        let exp_name = "trainlog_registry_no_backend";
        match get_logger(LoggerKind::Tensorboard, exp_name) {
            Err(err) => assert!(err.is_missing_dependency()),
            Ok(_) => panic!("expected a missing dependency error"),
        }
        assert!(!std::path::Path::new(exp_name).exists());
    }

    #[cfg(not(feature = "tensorboard"))]
    #[test]
    fn test_tensorboard_logger_new_without_backend() {
        let exp_name = "trainlog_new_no_backend";
        let err = TensorboardLogger::new(exp_name).unwrap_err();
        assert!(matches!(
            err,
            LoggerError::MissingOptionalDependency {
                dependency: crate::log::TENSORBOARD_BACKEND,
                ..
            }
        ));
        assert!(!std::path::Path::new(exp_name).exists());
    }
}
