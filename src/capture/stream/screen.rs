use std::time::Duration;

use image::imageops::{self, FilterType};
use xcap::Monitor;

use super::{FrameSource, SnapshotStream};
use crate::capture::errors::StreamError;
use crate::capture::types::FrameGeometry;

/// Snapshots the primary monitor, scaled to the capture geometry.
///
/// Pixels come out as RGBA, which is the channel order the transcoder expects.
#[derive(Default)]
pub struct ScreenSource;

impl ScreenSource {
    pub fn new() -> Self {
        Self
    }
}

impl FrameSource for ScreenSource {
    type Stream = SnapshotStream;

    fn open(&mut self, geometry: &FrameGeometry, _timeout: Duration) -> Result<SnapshotStream, StreamError> {
        let monitors = Monitor::all().map_err(|e| StreamError::Unavailable(e.to_string()))?;

        let monitor = monitors
            .iter()
            .find(|m| m.is_primary())
            .or_else(|| monitors.first())
            .ok_or_else(|| StreamError::Unavailable("No monitors found".to_string()))?;

        let captured = monitor
            .capture_image()
            .map_err(|e| StreamError::Unavailable(e.to_string()))?;

        let (width, height) = (geometry.width(), geometry.height());
        let pixels = if captured.width() == width && captured.height() == height {
            captured.into_raw()
        } else {
            tracing::debug!(target: "capture",
                "[STREAM] Scaling {}x{} monitor to {}x{}",
                captured.width(), captured.height(), width, height);
            imageops::resize(&captured, width, height, FilterType::Triangle).into_raw()
        };

        Ok(SnapshotStream::new(pixels))
    }
}
