//! Best-effort rename of a finished capture to its creation time.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::errors::FinalizeError;
use super::storage::{CaptureFs, BITMAP_DIR};

/// File name for a capture created at `created`, e.g. `2024-03-09_07-05-01.bmp`.
pub fn timestamp_file_name(created: DateTime<Utc>) -> String {
    created.format("%Y-%m-%d_%H-%M-%S.bmp").to_string()
}

/// Renames `path` to its UTC creation timestamp.
///
/// Failure is an acceptable outcome: the capture simply keeps its tick name.
/// Callers are expected to log and drop the error rather than propagate it.
pub fn finalize_capture<F: CaptureFs>(fs: &F, path: &Path) -> Result<PathBuf, FinalizeError> {
    let created = fs.created_at(path).map_err(|source| FinalizeError::Timestamp {
        path: path.to_path_buf(),
        source,
    })?;

    let target = Path::new(BITMAP_DIR).join(timestamp_file_name(created));
    fs.rename_file(path, &target)
        .map_err(|source| FinalizeError::Rename {
            from: path.to_path_buf(),
            to: target.clone(),
            source,
        })?;

    Ok(target)
}
