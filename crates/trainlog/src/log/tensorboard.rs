//! TensorBoard logging backend.

use super::video::{default_video_probe, VideoCapability, VideoProbe};
use super::{Experiment, ExperimentBackend, Hparams, Logger, VideoOptions};
use crate::Result;
use ndarray::ArrayD;
use std::fmt;
use std::path::{Path, PathBuf};

/// Tag used for the hyperparameter text event.
pub const HPARAMS_TAG: &str = "hparams";

/// Name reported when the TensorBoard backend is missing.
pub const TENSORBOARD_BACKEND: &str = "tensorboard event writer (feature `tensorboard`)";

/// Whether the built-in event-file backend is compiled in.
pub fn tensorboard_available() -> bool {
    cfg!(feature = "tensorboard")
}

/// Backend writing TensorBoard event files under `root/exp_name`.
#[derive(Clone, Debug)]
pub struct EventFileBackend {
    root: Option<PathBuf>,
    filename_suffix: String,
    default_fps: u32,
}

impl Default for EventFileBackend {
    fn default() -> Self {
        Self {
            root: None,
            filename_suffix: String::new(),
            default_fps: 4,
        }
    }
}

impl EventFileBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory the experiment directories are created in.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Suffix appended to event file names.
    pub fn filename_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.filename_suffix = suffix.into();
        self
    }

    /// Frame rate used when a video event carries no `fps` option.
    pub fn default_fps(mut self, fps: u32) -> Self {
        self.default_fps = fps;
        self
    }

    /// Directory a session for `exp_name` writes to.
    pub fn log_dir_for(&self, exp_name: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(exp_name),
            None => PathBuf::from(exp_name),
        }
    }
}

impl ExperimentBackend for EventFileBackend {
    type Session = Box<dyn Experiment>;

    fn name(&self) -> &'static str {
        "tensorboard"
    }

    #[cfg(feature = "tensorboard")]
    fn open(&self, exp_name: &str) -> Result<Self::Session> {
        let writer = crate::event::EventWriter::create(
            self.log_dir_for(exp_name),
            &self.filename_suffix,
        )?
        .with_default_fps(self.default_fps);
        Ok(Box::new(writer))
    }

    #[cfg(not(feature = "tensorboard"))]
    fn open(&self, _exp_name: &str) -> Result<Self::Session> {
        Err(crate::LoggerError::MissingOptionalDependency {
            dependency: TENSORBOARD_BACKEND,
            purpose: "TensorboardLogger cannot create an experiment",
        })
    }
}

/// Logger that writes to a TensorBoard-style backend.
///
/// # Example
///
/// ```ignore
/// let mut logger = TensorboardLogger::new("runs/ppo_cartpole")?;
/// logger.log_scalar("loss", 0.5, Some(10))?;
/// logger.log_hparams(&Hparams::new().with("lr", 3e-4))?;
/// println!("{}", logger.log_dir().display());
/// ```
pub struct TensorboardLogger<B: ExperimentBackend = EventFileBackend> {
    exp_name: String,
    experiment: B::Session,
    log_dir: PathBuf,
    video: VideoCapability,
}

impl TensorboardLogger {
    /// Create a logger writing event files to the directory `exp_name`.
    pub fn new(exp_name: impl Into<String>) -> Result<Self> {
        Self::with_backend(exp_name, EventFileBackend::default())
    }
}

impl<B: ExperimentBackend> TensorboardLogger<B> {
    /// Create a logger on the given backend.
    pub fn with_backend(exp_name: impl Into<String>, backend: B) -> Result<Self> {
        Self::with_video_probe(exp_name, backend, Box::new(default_video_probe))
    }

    /// Create a logger with a custom video encoder probe.
    pub fn with_video_probe(
        exp_name: impl Into<String>,
        backend: B,
        probe: VideoProbe,
    ) -> Result<Self> {
        let exp_name = exp_name.into();
        let experiment = Self::create_experiment(&backend, &exp_name)?;
        let log_dir = experiment.log_dir().to_path_buf();

        Ok(Self {
            exp_name,
            experiment,
            log_dir,
            video: VideoCapability::new(probe),
        })
    }

    /// Open the backend session for `exp_name`.
    fn create_experiment(backend: &B, exp_name: &str) -> Result<B::Session> {
        let experiment = backend.open(exp_name)?;
        tracing::info!(
            backend = backend.name(),
            exp_name,
            log_dir = %experiment.log_dir().display(),
            "Created experiment"
        );
        Ok(experiment)
    }

    /// The backend session.
    pub fn experiment(&self) -> &B::Session {
        &self.experiment
    }
}

impl<B: ExperimentBackend> Logger for TensorboardLogger<B> {
    fn exp_name(&self) -> &str {
        &self.exp_name
    }

    fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    fn log_scalar(&mut self, name: &str, value: f64, step: Option<u64>) -> Result<()> {
        self.experiment.add_scalar(name, value, step)
    }

    fn log_video(
        &mut self,
        name: &str,
        video: &ArrayD<f32>,
        step: Option<u64>,
        options: &VideoOptions,
    ) -> Result<()> {
        self.video.ensure("TensorboardLogger")?;
        self.experiment.add_video(name, video, step, options)
    }

    fn log_hparams(&mut self, cfg: &Hparams) -> Result<()> {
        self.experiment.add_text(HPARAMS_TAG, &cfg.to_text(), None)
    }

    fn render(&self) -> String {
        self.experiment.describe()
    }

    fn flush(&mut self) -> Result<()> {
        self.experiment.flush()
    }
}

impl<B: ExperimentBackend> fmt::Display for TensorboardLogger<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<B: ExperimentBackend> fmt::Debug for TensorboardLogger<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TensorboardLogger")
            .field("exp_name", &self.exp_name)
            .field("log_dir", &self.log_dir)
            .field("video", &self.video)
            .finish_non_exhaustive()
    }
}
