use std::path::{Path, PathBuf};

use super::header::{BitmapHeader, HEADER_LEN};
use crate::capture::errors::BitmapError;
use crate::capture::storage::{CaptureFile, CaptureFs};

/// Streams a bitmap onto storage chunk by chunk.
///
/// Doubles as a cleanup guard: dropped without [`finish`](Self::finish) it
/// closes the file and deletes it, so a failed write never leaves a partial
/// bitmap behind.
pub struct BitmapFileWriter<'fs, F: CaptureFs> {
    fs: &'fs F,
    path: PathBuf,
    file: Option<F::File>,
    header: BitmapHeader,
    offset: u64,
    completed: bool,
}

impl<'fs, F: CaptureFs> BitmapFileWriter<'fs, F> {
    /// Creates `path` at its final size and opens it.
    ///
    /// A creation conflict is an error; an existing file is never overwritten.
    pub fn create(fs: &'fs F, path: &Path, header: BitmapHeader) -> Result<Self, BitmapError> {
        fs.create_file(path, header.file_len())
            .map_err(|source| BitmapError::Create {
                path: path.to_path_buf(),
                source,
            })?;

        // From here on the file exists and must go away on failure.
        let mut writer = Self {
            fs,
            path: path.to_path_buf(),
            file: None,
            header,
            offset: 0,
            completed: false,
        };

        let file = fs.open_for_write(path).map_err(|source| BitmapError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        writer.file = Some(file);

        tracing::debug!(target: "capture", "[BITMAP] Created {:?} ({} bytes)", path, header.file_len());
        Ok(writer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Writes the header at offset 0.
    pub fn write_header(&mut self) -> Result<(), BitmapError> {
        let bytes = self.header.to_bytes();
        self.write_at(0, &bytes)?;
        self.offset = HEADER_LEN as u64;
        Ok(())
    }

    /// Writes one transcoded chunk right after the previous one.
    pub fn append_chunk(&mut self, chunk: &[u8]) -> Result<(), BitmapError> {
        let offset = self.offset;
        self.write_at(offset, chunk)?;
        self.offset += chunk.len() as u64;
        Ok(())
    }

    /// Checks that the file is complete, closes it and disarms the cleanup.
    pub fn finish(mut self) -> Result<PathBuf, BitmapError> {
        let expected = self.header.file_len();
        if self.offset != expected {
            return Err(BitmapError::SizeMismatch {
                written: self.offset,
                expected,
            });
        }

        self.file = None;
        self.completed = true;
        Ok(std::mem::take(&mut self.path))
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<(), BitmapError> {
        let file = self.file.as_mut().ok_or_else(|| BitmapError::Write {
            offset,
            len: buf.len(),
            source: std::io::Error::new(std::io::ErrorKind::NotConnected, "file is closed"),
        })?;

        file.write_at(offset, buf).map_err(|source| BitmapError::Write {
            offset,
            len: buf.len(),
            source,
        })
    }
}

impl<F: CaptureFs> Drop for BitmapFileWriter<'_, F> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }

        // Close before deleting
        self.file = None;

        tracing::warn!(target: "capture", "[BITMAP] Incomplete bitmap, deleting {:?}", self.path);
        if let Err(e) = self.fs.delete_file(&self.path) {
            tracing::warn!(target: "capture", "[BITMAP] Failed to delete partial file: {}", e);
        }
    }
}
