//! TensorBoard event-file session.

use super::proto::{encode_event, Event, Summary};
use super::record::RecordWriter;
use crate::log::{Experiment, VideoOptions};
use crate::{LoggerError, Result};
use ndarray::ArrayD;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static FILE_UID: AtomicU64 = AtomicU64::new(0);

/// Session writing one TensorBoard event file.
///
/// Every event is flushed as soon as it is written. A missing step resolves to
/// one past the last step written under the same tag, starting at 0.
pub struct EventWriter {
    log_dir: PathBuf,
    path: PathBuf,
    records: RecordWriter<BufWriter<File>>,
    last_steps: HashMap<String, i64>,
    #[cfg_attr(not(feature = "video"), allow(dead_code))]
    default_fps: u32,
}

impl EventWriter {
    /// Create `log_dir` if needed and open a fresh event file in it.
    pub fn create(log_dir: impl AsRef<Path>, filename_suffix: &str) -> Result<Self> {
        let log_dir = log_dir.as_ref().to_path_buf();
        fs::create_dir_all(&log_dir)?;

        let path = log_dir.join(event_file_name(filename_suffix));
        let file = OpenOptions::new().write(true).create_new(true).open(&path)?;

        let mut writer = Self {
            log_dir,
            path,
            records: RecordWriter::new(BufWriter::new(file)),
            last_steps: HashMap::new(),
            default_fps: 4,
        };
        writer.write_event(&Event::file_version(wall_time()))?;
        tracing::info!(path = %writer.path.display(), "Opened event file");

        Ok(writer)
    }

    /// Frame rate for videos logged without an `fps` option.
    pub fn with_default_fps(mut self, fps: u32) -> Self {
        self.default_fps = fps;
        self
    }

    /// Path of the event file being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Event files store steps as `int64`.
    fn resolve_step(&self, tag: &str, step: Option<u64>) -> Result<i64> {
        match step {
            Some(step) => i64::try_from(step).map_err(|_| {
                LoggerError::InvalidStep(format!("{} is larger than {}", step, i64::MAX))
            }),
            None => self
                .last_steps
                .get(tag)
                .map_or(Some(0), |last| last.checked_add(1))
                .ok_or_else(|| {
                    LoggerError::InvalidStep(format!("no step follows {} for tag {:?}", i64::MAX, tag))
                }),
        }
    }

    fn write_summary(&mut self, tag: &str, summary: Summary, step: Option<u64>) -> Result<()> {
        let step = self.resolve_step(tag, step)?;
        tracing::debug!(tag, step, "Writing summary");
        self.write_event(&Event::summary(wall_time(), step, summary))?;
        self.last_steps.insert(tag.to_string(), step);
        Ok(())
    }

    fn write_event(&mut self, event: &Event) -> Result<()> {
        self.records
            .write_record(&encode_event(event))
            .and_then(|_| self.records.flush())
            .map_err(LoggerError::backend)
    }

    #[cfg(feature = "video")]
    fn video_fps(&self, options: &VideoOptions) -> Result<u32> {
        match options.get("fps") {
            None => Ok(self.default_fps),
            Some(value) => value
                .as_u64()
                .and_then(|fps| u32::try_from(fps).ok())
                .filter(|fps| *fps > 0)
                .ok_or_else(|| {
                    LoggerError::InvalidVideo(format!("fps must be a positive integer, got {}", value))
                }),
        }
    }
}

impl Experiment for EventWriter {
    fn backend_name(&self) -> &'static str {
        "tensorboard"
    }

    fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    fn add_scalar(&mut self, tag: &str, value: f64, step: Option<u64>) -> Result<()> {
        self.write_summary(tag, Summary::scalar(tag, value as f32), step)
    }

    #[cfg(feature = "video")]
    fn add_video(
        &mut self,
        tag: &str,
        video: &ArrayD<f32>,
        step: Option<u64>,
        options: &VideoOptions,
    ) -> Result<()> {
        let fps = self.video_fps(options)?;
        let image = super::animation::encode_video(video, fps)?;
        self.write_summary(tag, Summary::image(tag, image), step)
    }

    #[cfg(not(feature = "video"))]
    fn add_video(
        &mut self,
        _tag: &str,
        _video: &ArrayD<f32>,
        _step: Option<u64>,
        _options: &VideoOptions,
    ) -> Result<()> {
        Err(LoggerError::MissingOptionalDependency {
            dependency: crate::log::VIDEO_ENCODER,
            purpose: "videos cannot be encoded",
        })
    }

    fn add_text(&mut self, tag: &str, text: &str, step: Option<u64>) -> Result<()> {
        self.write_summary(tag, Summary::text(tag, text), step)
    }

    fn flush(&mut self) -> Result<()> {
        self.records.flush().map_err(LoggerError::backend)
    }

    fn describe(&self) -> String {
        format!(
            "EventWriter(log_dir={:?}, file={:?})",
            self.log_dir,
            self.path.file_name().unwrap_or_default()
        )
    }
}

impl Drop for EventWriter {
    fn drop(&mut self) {
        if let Err(e) = self.records.flush() {
            tracing::warn!(path = %self.path.display(), "Failed to flush event file: {}", e);
        } else {
            tracing::debug!(path = %self.path.display(), "Closed event file");
        }
    }
}

/// `events.out.tfevents.<secs>.<host>.<pid>.<uid><suffix>`
fn event_file_name(suffix: &str) -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
    format!(
        "events.out.tfevents.{:010}.{}.{}.{}{}",
        secs,
        host,
        std::process::id(),
        FILE_UID.fetch_add(1, Ordering::Relaxed),
        suffix
    )
}

fn wall_time() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::proto::{event, summary_value, FILE_VERSION};
    use crate::event::read_events;
    use tempfile::tempdir;

    fn scalar_of(event: &Event) -> (String, f32) {
        let value = &event.as_summary().unwrap().value[0];
        match value.value {
            Some(summary_value::Value::SimpleValue(v)) => (value.tag.clone(), v),
            _ => panic!("expected a scalar"),
        }
    }

    #[test]
    fn test_create_writes_file_version() {
        let dir = tempdir().unwrap();
        let writer = EventWriter::create(dir.path().join("run1"), ".test").unwrap();

        assert_eq!(writer.log_dir(), dir.path().join("run1"));
        let name = writer.path().file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("events.out.tfevents."));
        assert!(name.ends_with(".test"));

        let events = read_events(writer.path()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].what,
            Some(event::What::FileVersion(FILE_VERSION.to_string()))
        );
    }

    #[test]
    fn test_two_writers_same_dir_distinct_files() {
        let dir = tempdir().unwrap();
        let a = EventWriter::create(dir.path(), "").unwrap();
        let b = EventWriter::create(dir.path(), "").unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_scalar_steps_auto_increment_per_tag() {
        let dir = tempdir().unwrap();
        let mut writer = EventWriter::create(dir.path(), "").unwrap();

        writer.add_scalar("loss", 1.0, None).unwrap();
        writer.add_scalar("loss", 0.5, None).unwrap();
        writer.add_scalar("reward", 3.0, None).unwrap();
        writer.add_scalar("loss", 0.25, Some(10)).unwrap();
        writer.add_scalar("loss", 0.125, None).unwrap();

        let events = read_events(writer.path()).unwrap();
        let steps: Vec<i64> = events[1..].iter().map(|e| e.step).collect();
        assert_eq!(steps, vec![0, 1, 0, 10, 11]);
        assert_eq!(scalar_of(&events[2]), ("loss".to_string(), 0.5));
        assert_eq!(scalar_of(&events[3]), ("reward".to_string(), 3.0));
    }

    #[test]
    fn test_step_at_int64_limit() {
        let dir = tempdir().unwrap();
        let mut writer = EventWriter::create(dir.path(), "").unwrap();

        writer.add_scalar("loss", 1.0, Some(i64::MAX as u64)).unwrap();
        let err = writer.add_scalar("loss", 2.0, None).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidStep(_)));

        let err = writer.add_scalar("loss", 3.0, Some(u64::MAX)).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidStep(_)));
        let err = writer.add_scalar("reward", 3.0, Some(1 << 63)).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidStep(_)));

        let events = read_events(writer.path()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].step, i64::MAX);
    }

    #[test]
    fn test_rejected_event_keeps_step_counter() {
        let dir = tempdir().unwrap();
        let mut writer = EventWriter::create(dir.path(), "").unwrap();

        writer.add_scalar("loss", 1.0, None).unwrap();
        assert!(writer.add_scalar("loss", 2.0, Some(u64::MAX)).is_err());
        writer.add_scalar("loss", 3.0, None).unwrap();

        let events = read_events(writer.path()).unwrap();
        let steps: Vec<i64> = events[1..].iter().map(|e| e.step).collect();
        assert_eq!(steps, vec![0, 1]);
        assert_eq!(scalar_of(&events[2]), ("loss".to_string(), 3.0));
    }

    #[test]
    fn test_text_event() {
        let dir = tempdir().unwrap();
        let mut writer = EventWriter::create(dir.path(), "").unwrap();
        writer.add_text("hparams", "batch: 32\n\tlr: 0.1", None).unwrap();

        let events = read_events(writer.path()).unwrap();
        let value = &events[1].as_summary().unwrap().value[0];
        assert_eq!(value.tag, "hparams");
        match &value.value {
            Some(summary_value::Value::Tensor(t)) => {
                assert_eq!(t.string_val, vec![b"batch: 32\n\tlr: 0.1".to_vec()]);
            }
            _ => panic!("expected a text tensor"),
        }
    }

    #[cfg(feature = "video")]
    #[test]
    fn test_video_event_and_fps_option() {
        use ndarray::IxDyn;

        let dir = tempdir().unwrap();
        let mut writer = EventWriter::create(dir.path(), "").unwrap();
        let video = ArrayD::from_elem(IxDyn(&[2, 3, 3, 8, 8]), 0.25f32);

        writer
            .add_video("rollout", &video, Some(5), &VideoOptions::new().with("fps", 10))
            .unwrap();

        let err = writer
            .add_video("rollout", &video, None, &VideoOptions::new().with("fps", "fast"))
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidVideo(_)));

        let events = read_events(writer.path()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].step, 5);
        match &events[1].as_summary().unwrap().value[0].value {
            Some(summary_value::Value::Image(image)) => {
                assert_eq!((image.width, image.height), (16, 8));
                assert!(image.encoded_image_string.starts_with(b"GIF89a"));
            }
            _ => panic!("expected an image"),
        }
    }

    #[test]
    fn test_describe_names_log_dir() {
        let dir = tempdir().unwrap();
        let writer = EventWriter::create(dir.path().join("exp"), "").unwrap();
        let repr = writer.describe();
        assert!(repr.starts_with("EventWriter(log_dir="));
        assert!(repr.contains("exp"));
        assert!(repr.contains("events.out.tfevents."));
    }
}
