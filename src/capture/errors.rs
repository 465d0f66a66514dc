use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the raw frame stream collaborator.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Frame stream service is unavailable: {0}")]
    Unavailable(String),
    #[error("Short read at row {row}: expected {expected} bytes, got {actual}")]
    ShortRead {
        row: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Frame stream read failed: {0}")]
    Read(#[from] io::Error),
}

/// Errors while laying the bitmap down on storage.
#[derive(Error, Debug)]
pub enum BitmapError {
    #[error("Failed to create bitmap directory {path:?}: {source}")]
    Directory { path: PathBuf, source: io::Error },
    #[error("Failed to create bitmap file {path:?}: {source}")]
    Create { path: PathBuf, source: io::Error },
    #[error("Failed to open bitmap file {path:?}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("Failed to write {len} bytes at offset {offset}: {source}")]
    Write {
        offset: u64,
        len: usize,
        source: io::Error,
    },
    #[error("Bitmap size mismatch: wrote {written} of {expected} bytes")]
    SizeMismatch { written: u64, expected: u64 },
}

/// Errors from the timestamp rename. Never propagated past the finalizer's caller.
#[derive(Error, Debug)]
pub enum FinalizeError {
    #[error("Failed to read creation time of {path:?}: {source}")]
    Timestamp { path: PathBuf, source: io::Error },
    #[error("Failed to rename {from:?} to {to:?}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Top-level error type for a capture commit.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error(transparent)]
    Bitmap(#[from] BitmapError),
    #[error("Commit requested without an open frame stream")]
    NoOpenStream,
}

impl CaptureError {
    /// Returns true if storage rejected the write, as opposed to the stream failing.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, CaptureError::Bitmap(_))
    }
}

/// Errors setting up a button source.
#[derive(Error, Debug)]
pub enum ButtonError {
    #[error("Failed to register capture key: {0}")]
    Register(String),
}
