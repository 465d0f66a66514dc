//! Filesystem seam for the capture pipeline.
//!
//! Paths handed to a [`CaptureFs`] are absolute within the removable storage
//! volume (`/Bitmaps/...`). [`SdCardFs`] maps them under a host directory.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::errors::BitmapError;
use super::types::Tick;
use crate::shared::paths::ensure_dir;

/// Directory all captures land in.
pub const BITMAP_DIR: &str = "/Bitmaps";

/// A file opened for positional writes.
pub trait CaptureFile {
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<()>;
}

/// Storage operations the capture pipeline needs.
pub trait CaptureFs {
    type File: CaptureFile;

    /// Creates one directory. Must report `AlreadyExists` if it is present.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Creates a new file of exactly `size` bytes. Fails if `path` exists.
    fn create_file(&self, path: &Path, size: u64) -> io::Result<()>;

    fn open_for_write(&self, path: &Path) -> io::Result<Self::File>;

    fn delete_file(&self, path: &Path) -> io::Result<()>;

    /// Moves `from` to `to`. Fails if `to` exists.
    fn rename_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn created_at(&self, path: &Path) -> io::Result<DateTime<Utc>>;
}

/// Creates the bitmap directory; an existing directory counts as success.
pub fn ensure_bitmap_dir<F: CaptureFs>(fs: &F) -> Result<(), BitmapError> {
    let dir = Path::new(BITMAP_DIR);
    match fs.create_dir(dir) {
        Ok(()) => {
            tracing::debug!(target: "capture", "[BITMAP] Created {}", BITMAP_DIR);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(BitmapError::Directory {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Initial, tick-derived path of a capture.
pub fn tick_path(tick: Tick) -> PathBuf {
    Path::new(BITMAP_DIR).join(format!("{}.bmp", tick))
}

/// Removable storage backed by a host directory.
pub struct SdCardFs {
    root: PathBuf,
}

impl SdCardFs {
    /// Uses `root` as the volume root, creating it if necessary.
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Host path for a volume path.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path.strip_prefix("/").unwrap_or(path))
    }
}

pub struct SdCardFile {
    file: File,
}

impl CaptureFile for SdCardFile {
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(buf)
    }
}

impl CaptureFs for SdCardFs {
    type File = SdCardFile;

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(self.resolve(path))
    }

    fn create_file(&self, path: &Path, size: u64) -> io::Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.resolve(path))?;
        file.set_len(size)
    }

    fn open_for_write(&self, path: &Path) -> io::Result<Self::File> {
        let file = OpenOptions::new().write(true).open(self.resolve(path))?;
        Ok(SdCardFile { file })
    }

    fn delete_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(self.resolve(path))
    }

    /// Links `to` and drops `from`. Linking fails with `AlreadyExists` if
    /// `to` is present, so an existing file is never replaced.
    fn rename_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        let from = self.resolve(from);
        fs::hard_link(&from, self.resolve(to))?;
        fs::remove_file(from)
    }

    fn created_at(&self, path: &Path) -> io::Result<DateTime<Utc>> {
        let created = fs::metadata(self.resolve(path))?.created()?;
        Ok(DateTime::<Utc>::from(created))
    }
}
