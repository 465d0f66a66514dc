use std::path::PathBuf;
use std::time::Duration;

use super::{FrameSource, SnapshotStream};
use crate::capture::errors::StreamError;
use crate::capture::types::FrameGeometry;

/// Serves snapshots of a raw four-byte-per-pixel frame file.
///
/// The file is read in full on every open, so whatever it holds at that
/// moment is what gets captured.
pub struct RawDumpSource {
    path: PathBuf,
}

impl RawDumpSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FrameSource for RawDumpSource {
    type Stream = SnapshotStream;

    fn open(&mut self, geometry: &FrameGeometry, _timeout: Duration) -> Result<SnapshotStream, StreamError> {
        let mut pixels = std::fs::read(&self.path)
            .map_err(|e| StreamError::Unavailable(format!("{:?}: {}", self.path, e)))?;

        let expected = geometry.source_frame_len();
        if pixels.len() < expected {
            return Err(StreamError::Unavailable(format!(
                "{:?} holds {} bytes, a {}x{} frame needs {}",
                self.path,
                pixels.len(),
                geometry.width(),
                geometry.height(),
                expected
            )));
        }
        pixels.truncate(expected);

        Ok(SnapshotStream::new(pixels))
    }
}
