//! Test doubles for the capture collaborators.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use holdshot_lib::capture::{
    CaptureFile, CaptureFs, Clock, FrameGeometry, FrameSource, RawFrameStream, SnapshotStream,
    StreamError, Tick,
};

// =============================================================================
// In-memory storage
// =============================================================================

#[derive(Default)]
struct MemoryState {
    dirs: HashSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
    writes: usize,
    fail_on_write: Option<usize>,
    created_at: Option<DateTime<Utc>>,
    fail_rename: bool,
    write_log: Vec<(u64, usize)>,
}

/// Storage volume held in memory. Clones share the same volume.
#[derive(Clone, Default)]
pub struct MemoryFs {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.state.borrow_mut().created_at = Some(Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap());
        fs
    }

    /// The `n`th write (1-based, header included) fails.
    pub fn fail_on_write(&self, n: usize) {
        self.state.borrow_mut().fail_on_write = Some(n);
    }

    /// Creation timestamps cannot be read.
    pub fn without_timestamps(&self) {
        self.state.borrow_mut().created_at = None;
    }

    pub fn fail_renames(&self) {
        self.state.borrow_mut().fail_rename = true;
    }

    pub fn insert_file(&self, path: &str, contents: &[u8]) {
        self.state
            .borrow_mut()
            .files
            .insert(PathBuf::from(path), contents.to_vec());
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.state.borrow().files.keys().cloned().collect()
    }

    pub fn read(&self, path: &Path) -> Option<Vec<u8>> {
        self.state.borrow().files.get(path).cloned()
    }

    pub fn has_dir(&self, path: &str) -> bool {
        self.state.borrow().dirs.contains(Path::new(path))
    }

    /// `(offset, len)` of every successful write, in order.
    pub fn write_log(&self) -> Vec<(u64, usize)> {
        self.state.borrow().write_log.clone()
    }
}

pub struct MemoryFile {
    state: Rc<RefCell<MemoryState>>,
    path: PathBuf,
}

impl CaptureFile for MemoryFile {
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        state.writes += 1;
        if state.fail_on_write == Some(state.writes) {
            return Err(io::Error::new(io::ErrorKind::Other, "storage full"));
        }

        let file = state
            .files
            .get_mut(&self.path)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        let start = offset as usize;
        let end = start + buf.len();
        if end > file.len() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "write past end of file"));
        }
        file[start..end].copy_from_slice(buf);
        state.write_log.push((offset, buf.len()));
        Ok(())
    }
}

impl CaptureFs for MemoryFs {
    type File = MemoryFile;

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        if self.state.borrow_mut().dirs.insert(path.to_path_buf()) {
            Ok(())
        } else {
            Err(io::Error::from(io::ErrorKind::AlreadyExists))
        }
    }

    fn create_file(&self, path: &Path, size: u64) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        let parent = path.parent().unwrap_or(Path::new("/"));
        if !state.dirs.contains(parent) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        if state.files.contains_key(path) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        state.files.insert(path.to_path_buf(), vec![0; size as usize]);
        Ok(())
    }

    fn open_for_write(&self, path: &Path) -> io::Result<MemoryFile> {
        if !self.state.borrow().files.contains_key(path) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        Ok(MemoryFile {
            state: self.state.clone(),
            path: path.to_path_buf(),
        })
    }

    fn delete_file(&self, path: &Path) -> io::Result<()> {
        self.state
            .borrow_mut()
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn rename_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_rename {
            return Err(io::Error::new(io::ErrorKind::Other, "rename refused"));
        }
        if state.files.contains_key(to) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        let contents = state
            .files
            .remove(from)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        state.files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    fn created_at(&self, path: &Path) -> io::Result<DateTime<Utc>> {
        let state = self.state.borrow();
        if !state.files.contains_key(path) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        state
            .created_at
            .ok_or_else(|| io::Error::from(io::ErrorKind::Unsupported))
    }
}

// =============================================================================
// Scripted frame source
// =============================================================================

/// Serves a fixed frame and counts opens and closes.
#[derive(Clone)]
pub struct ScriptedSource {
    frame: Rc<Vec<u8>>,
    available: Rc<Cell<bool>>,
    opens: Rc<Cell<u32>>,
    closes: Rc<Cell<u32>>,
}

impl ScriptedSource {
    pub fn new(frame: Vec<u8>) -> Self {
        Self {
            frame: Rc::new(frame),
            available: Rc::new(Cell::new(true)),
            opens: Rc::new(Cell::new(0)),
            closes: Rc::new(Cell::new(0)),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub fn opens(&self) -> u32 {
        self.opens.get()
    }

    pub fn closes(&self) -> u32 {
        self.closes.get()
    }
}

pub struct ScriptedStream {
    inner: SnapshotStream,
    closes: Rc<Cell<u32>>,
}

impl RawFrameStream for ScriptedStream {
    fn read(&mut self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        self.inner.read(buf, offset)
    }

    fn close(&mut self) {
        self.closes.set(self.closes.get() + 1);
        self.inner.close();
    }
}

impl FrameSource for ScriptedSource {
    type Stream = ScriptedStream;

    fn open(&mut self, _: &FrameGeometry, _: Duration) -> Result<ScriptedStream, StreamError> {
        if !self.available.get() {
            return Err(StreamError::Unavailable("compositor busy".to_string()));
        }
        self.opens.set(self.opens.get() + 1);
        Ok(ScriptedStream {
            inner: SnapshotStream::new(self.frame.as_ref().clone()),
            closes: self.closes.clone(),
        })
    }
}

// =============================================================================
// Manual clock
// =============================================================================

#[derive(Clone)]
pub struct ManualClock {
    nanos: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            nanos: Rc::new(Cell::new(1_000_000_000)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.set(self.nanos.get() + by.as_nanos() as u64);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Tick {
        Tick::from_nanos(self.nanos.get())
    }
}

// =============================================================================
// Frames
// =============================================================================

/// A frame where every pixel of row `y` is `rows[y]`.
pub fn solid_rows_frame(geometry: &FrameGeometry, rows: &[[u8; 4]]) -> Vec<u8> {
    assert_eq!(rows.len(), geometry.height() as usize);
    rows.iter()
        .flat_map(|px| px.repeat(geometry.width() as usize))
        .collect()
}

/// A frame where each row carries its own index in the first channel.
pub fn row_index_frame(geometry: &FrameGeometry) -> Vec<u8> {
    let rows: Vec<[u8; 4]> = (0..geometry.height())
        .map(|y| [y as u8, 0x11, 0x22, 0xFF])
        .collect();
    solid_rows_frame(geometry, &rows)
}
