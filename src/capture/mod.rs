//! Hold-to-capture pipeline: button timing, raw frame stream, transcoder and
//! bitmap writer.

pub mod bitmap;
pub mod button;
pub mod clock;
pub mod errors;
pub mod finalize;
pub mod session;
pub mod storage;
pub mod stream;
pub mod transcode;
pub mod types;

pub use button::{ButtonEdge, ButtonSource, ChannelButton, WaitOutcome};
pub use clock::{Clock, MonotonicClock};
pub use errors::{BitmapError, CaptureError, FinalizeError, StreamError};
pub use session::{CaptureService, SessionState};
pub use storage::{CaptureFile, CaptureFs, SdCardFs, BITMAP_DIR};
pub use stream::{FrameSource, FrameStreamSession, RawDumpSource, RawFrameStream, SnapshotStream};
pub use types::{FrameGeometry, Tick};
