pub mod dump;
#[cfg(feature = "desktop")]
pub mod screen;
pub mod snapshot;

pub use dump::RawDumpSource;
#[cfg(feature = "desktop")]
pub use screen::ScreenSource;
pub use snapshot::SnapshotStream;

use std::io;
use std::time::Duration;

use super::errors::StreamError;
use super::types::FrameGeometry;

/// Service that hands out raw snapshots of the compositor output.
pub trait FrameSource {
    type Stream: RawFrameStream;

    /// Takes a snapshot at `geometry`. Fails with [`StreamError::Unavailable`]
    /// when the service cannot provide one.
    fn open(&mut self, geometry: &FrameGeometry, timeout: Duration)
        -> Result<Self::Stream, StreamError>;
}

/// An open raw-pixel stream, four bytes per pixel, top row first.
pub trait RawFrameStream {
    /// Reads up to `buf.len()` bytes starting `offset` bytes into the frame.
    /// Returns the number of bytes written into `buf`.
    fn read(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize>;

    /// Releases the platform stream.
    fn close(&mut self);
}

/// An open stream whose release is guaranteed.
///
/// [`close`](Self::close) releases the stream explicitly; dropping the
/// session without closing it releases it as well. Either way the
/// underlying `close` runs exactly once.
pub struct FrameStreamSession<T: RawFrameStream> {
    stream: T,
    geometry: FrameGeometry,
    closed: bool,
}

impl<T: RawFrameStream> FrameStreamSession<T> {
    /// Opens a stream from `source` at `geometry`.
    pub fn open<S>(source: &mut S, geometry: FrameGeometry, timeout: Duration) -> Result<Self, StreamError>
    where
        S: FrameSource<Stream = T>,
    {
        let stream = source.open(&geometry, timeout)?;
        tracing::debug!(target: "capture", "[STREAM] Opened {}x{} stream", geometry.width(), geometry.height());
        Ok(Self {
            stream,
            geometry,
            closed: false,
        })
    }

    pub fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }

    /// Blocking read of `buf.len() / row_len` rows starting at `first_row`.
    ///
    /// Anything short of a full buffer is a protocol error.
    pub fn read_chunk(&mut self, first_row: u32, buf: &mut [u8]) -> Result<(), StreamError> {
        let offset = first_row as u64 * self.geometry.source_row_len() as u64;
        let actual = self.stream.read(buf, offset)?;
        if actual != buf.len() {
            return Err(StreamError::ShortRead {
                row: first_row,
                expected: buf.len(),
                actual,
            });
        }
        Ok(())
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.closed {
            return;
        }
        self.stream.close();
        self.closed = true;
        tracing::debug!(target: "capture", "[STREAM] Closed");
    }
}

impl<T: RawFrameStream> Drop for FrameStreamSession<T> {
    fn drop(&mut self) {
        self.release();
    }
}
