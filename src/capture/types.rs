use std::fmt;
use std::time::Duration;

use super::bitmap::HEADER_LEN;

/// Bytes per pixel in the raw compositor stream (three colour channels plus padding).
pub const SOURCE_PIXEL_STRIDE: usize = 4;
/// Bytes per pixel in the written bitmap.
pub const BITMAP_PIXEL_STRIDE: usize = 3;

/// How long the event loop waits for the capture button before re-checking
/// the hold timer. Roughly one display refresh.
pub const BUTTON_WAIT: Duration = Duration::from_millis(17);

/// A capture stream left open longer than this without a release is discarded.
pub const HOLD_CANCEL_THRESHOLD: Duration = Duration::from_millis(500);

/// Timeout handed to the frame source when opening a stream.
pub const STREAM_OPEN_TIMEOUT: Duration = Duration::from_millis(100);

/// Fixed frame dimensions and the number of rows moved per chunk.
///
/// Construct through [`FrameGeometry::new`], which rejects heights that are
/// not a multiple of the chunk height and frames whose bitmap would not fit
/// a 32-bit file size. In a `const` item that rejection happens at compile
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    width: u32,
    height: u32,
    chunk_rows: u32,
}

impl FrameGeometry {
    /// The handheld compositor output: 1280x720, ten rows per chunk.
    pub const HANDHELD: FrameGeometry = FrameGeometry::new(1280, 720, 10);

    pub const fn new(width: u32, height: u32, chunk_rows: u32) -> Self {
        assert!(width > 0 && height > 0, "frame must not be empty");
        assert!(chunk_rows > 0, "chunk must hold at least one row");
        assert!(
            height % chunk_rows == 0,
            "frame height must be a multiple of the chunk height"
        );
        assert!(
            (width as u64) * (BITMAP_PIXEL_STRIDE as u64) * (height as u64) + (HEADER_LEN as u64)
                <= u32::MAX as u64,
            "bitmap file size must fit in the 32-bit header field"
        );
        Self {
            width,
            height,
            chunk_rows,
        }
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub const fn chunk_rows(&self) -> u32 {
        self.chunk_rows
    }

    /// Number of chunks in one frame.
    pub const fn chunk_count(&self) -> u32 {
        self.height / self.chunk_rows
    }

    pub const fn source_row_len(&self) -> usize {
        self.width as usize * SOURCE_PIXEL_STRIDE
    }

    pub const fn bitmap_row_len(&self) -> usize {
        self.width as usize * BITMAP_PIXEL_STRIDE
    }

    /// Size of the scratch buffer holding one chunk of raw rows.
    pub const fn source_chunk_len(&self) -> usize {
        self.source_row_len() * self.chunk_rows as usize
    }

    /// Size of the scratch buffer holding one chunk of transcoded rows.
    pub const fn bitmap_chunk_len(&self) -> usize {
        self.bitmap_row_len() * self.chunk_rows as usize
    }

    /// Total raw frame size in bytes.
    pub const fn source_frame_len(&self) -> usize {
        self.source_row_len() * self.height as usize
    }

    /// Pixel data size of the bitmap (no row padding).
    pub const fn image_len(&self) -> u64 {
        self.bitmap_row_len() as u64 * self.height as u64
    }
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self::HANDHELD
    }
}

/// Monotonic timestamp in nanoseconds.
///
/// Doubles as the unique component of the initial bitmap file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tick(u64);

impl Tick {
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Time elapsed from `earlier` to `self`, saturating at zero.
    pub fn since(&self, earlier: Tick) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pre-allocated scratch space reused for every chunk of every capture.
pub struct ChunkBuffers {
    pub(crate) source: Vec<u8>,
    pub(crate) bitmap: Vec<u8>,
}

impl ChunkBuffers {
    pub fn new(geometry: &FrameGeometry) -> Self {
        Self {
            source: vec![0; geometry.source_chunk_len()],
            bitmap: vec![0; geometry.bitmap_chunk_len()],
        }
    }

    /// Whether these buffers were sized for `geometry`.
    pub fn fits(&self, geometry: &FrameGeometry) -> bool {
        self.source.len() == geometry.source_chunk_len()
            && self.bitmap.len() == geometry.bitmap_chunk_len()
    }
}
