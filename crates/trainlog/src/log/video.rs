//! Video options and the lazily probed video encoder capability.

use crate::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Name reported when the video encoder is missing.
pub const VIDEO_ENCODER: &str = "gif video encoder (feature `video`)";

/// Backend-specific options for a video event.
///
/// Passed through to the backend session unmodified; keys are not validated
/// here. The built-in TensorBoard session understands `fps`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoOptions(BTreeMap<String, Value>);

impl VideoOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Probe reporting whether the video encoder can be used.
pub type VideoProbe = Box<dyn FnMut() -> bool + Send>;

/// Default probe: the encoder is available when the `video` feature is compiled in.
pub fn default_video_probe() -> bool {
    cfg!(feature = "video")
}

/// Tracks whether the video encoder has been found.
///
/// The probe runs on each check until it succeeds once; after that it is never
/// called again.
pub struct VideoCapability {
    probe: VideoProbe,
    has_video_encoder: bool,
}

impl VideoCapability {
    pub fn new(probe: VideoProbe) -> Self {
        Self {
            probe,
            has_video_encoder: false,
        }
    }

    /// Whether a probe has already succeeded.
    pub fn is_available(&self) -> bool {
        self.has_video_encoder
    }

    /// Ensure the encoder is usable, probing if it has not been found yet.
    pub fn ensure(&mut self, logger: &'static str) -> Result<()> {
        if !self.has_video_encoder {
            if !(self.probe)() {
                tracing::warn!(logger, "Video encoder unavailable, video not logged");
                return Err(LoggerError::MissingOptionalDependency {
                    dependency: VIDEO_ENCODER,
                    purpose: "videos cannot be logged",
                });
            }
            tracing::debug!(logger, "Video encoder found");
            self.has_video_encoder = true;
        }
        Ok(())
    }
}

impl Default for VideoCapability {
    fn default() -> Self {
        Self::new(Box::new(default_video_probe))
    }
}

impl fmt::Debug for VideoCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoCapability")
            .field("has_video_encoder", &self.has_video_encoder)
            .finish_non_exhaustive()
    }
}
