//! TensorBoard event files.
//!
//! Provides:
//! - `EventWriter`, the built-in `Experiment` session
//! - TFRecord framing with masked CRC32C checksums
//! - `read_events` for inspecting written files

#[cfg(feature = "video")]
mod animation;
pub mod proto;
mod record;
mod writer;

pub use record::{masked_crc32c, read_records, RecordWriter};
pub use writer::EventWriter;

use crate::{LoggerError, Result};
use prost::Message;
use proto::Event;
use std::fs;
use std::path::{Path, PathBuf};

/// Decode every event stored in an event file.
pub fn read_events(path: impl AsRef<Path>) -> Result<Vec<Event>> {
    let bytes = fs::read(path.as_ref())?;
    read_records(&bytes)?
        .iter()
        .map(|record| Event::decode(record.as_slice()).map_err(LoggerError::backend))
        .collect()
}

/// Event files in `log_dir`, sorted by name.
pub fn find_event_files(log_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(log_dir.as_ref())?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("events.out.tfevents."))
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}
