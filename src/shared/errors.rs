use std::path::PathBuf;
use thiserror::Error;

use crate::capture::errors::{ButtonError, CaptureError};
use crate::core::settings::SettingsError;

/// Errors that stop the service.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to prepare storage root: {0}")]
    Storage(#[from] std::io::Error),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Button(#[from] ButtonError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("No frame source configured: set frameDump in {0:?}")]
    NoFrameSource(PathBuf),
}
