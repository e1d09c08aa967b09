//! In-memory control files for testing and development.
//!
//! [`MockControlFiles`] keeps node contents in a map and logs every write
//! attempt in order. Tests hold a [`MockControlFilesHandle`] to seed nodes,
//! inject failures and inspect what was written.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{HardwareError, Result, traits::ControlFiles};

/// One write attempt observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    /// Node the write targeted.
    pub path: PathBuf,

    /// Exact bytes written, including the trailing newline.
    pub line: String,

    /// Whether the write succeeded.
    pub succeeded: bool,
}

#[derive(Debug, Default)]
struct MockState {
    contents: HashMap<PathBuf, String>,
    unavailable: HashSet<PathBuf>,
    failing_writes: HashSet<PathBuf>,
    log: Vec<WriteRecord>,
}

fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock control file tree for testing and development.
///
/// Writes to unknown nodes succeed and create them, as if every sysfs
/// attribute existed. Use the handle to make nodes unavailable or failing.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use lights_hardware::mock::MockControlFiles;
/// use lights_hardware::traits::ControlFiles;
///
/// let (files, handle) = MockControlFiles::new();
/// handle.fail_writes("/sys/class/leds/white/pause_hi");
///
/// assert!(files.write_int(Path::new("/sys/class/leds/white/pause_lo"), 500).is_ok());
/// assert!(files.write_int(Path::new("/sys/class/leds/white/pause_hi"), 0).is_err());
///
/// assert_eq!(handle.write_count(), 2);
/// assert_eq!(handle.failed_writes().len(), 1);
/// ```
#[derive(Debug)]
pub struct MockControlFiles {
    state: Arc<Mutex<MockState>>,
}

impl MockControlFiles {
    /// Create an empty mock tree.
    ///
    /// Returns a tuple of (MockControlFiles, MockControlFilesHandle) where the
    /// handle inspects and manipulates the same tree.
    pub fn new() -> (Self, MockControlFilesHandle) {
        let state = Arc::new(Mutex::new(MockState::default()));

        let files = Self {
            state: Arc::clone(&state),
        };
        let handle = MockControlFilesHandle { state };

        (files, handle)
    }
}

impl Default for MockControlFiles {
    fn default() -> Self {
        Self::new().0
    }
}

impl ControlFiles for MockControlFiles {
    fn read_prefix(&self, path: &Path, max_len: usize) -> Result<Vec<u8>> {
        let state = lock(&self.state);
        if state.unavailable.contains(path) {
            return Err(HardwareError::path_unavailable(
                path,
                io::Error::from(io::ErrorKind::PermissionDenied),
            ));
        }

        match state.contents.get(path) {
            Some(content) => Ok(content.bytes().take(max_len).collect()),
            None => Err(HardwareError::path_unavailable(
                path,
                io::Error::from(io::ErrorKind::NotFound),
            )),
        }
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read_prefix(path, usize::MAX)?;
        String::from_utf8(bytes).map_err(|e| {
            HardwareError::parse_failure(path, String::from_utf8_lossy(e.as_bytes()))
        })
    }

    fn write_line(&self, path: &Path, value: &str) -> Result<()> {
        let mut state = lock(&self.state);
        let line = format!("{}\n", value);

        let outcome = if state.unavailable.contains(path) {
            Err(HardwareError::path_unavailable(
                path,
                io::Error::from(io::ErrorKind::PermissionDenied),
            ))
        } else if state.failing_writes.contains(path) {
            // EIO, what a wedged LED driver returns
            Err(HardwareError::io_failure(path, io::Error::from_raw_os_error(5)))
        } else {
            state.contents.insert(path.to_path_buf(), line.clone());
            Ok(())
        };

        state.log.push(WriteRecord {
            path: path.to_path_buf(),
            line,
            succeeded: outcome.is_ok(),
        });
        outcome
    }

    fn exists(&self, path: &Path) -> bool {
        let state = lock(&self.state);
        state.contents.contains_key(path) || state.unavailable.contains(path)
    }
}

/// Handle for controlling a mock control file tree.
///
/// Cloneable; all clones see the same tree.
#[derive(Debug, Clone)]
pub struct MockControlFilesHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockControlFilesHandle {
    /// Create or replace a node with the given content.
    pub fn set_contents(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        lock(&self.state)
            .contents
            .insert(path.as_ref().to_path_buf(), content.into());
    }

    /// Current content of a node.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        lock(&self.state).contents.get(path.as_ref()).cloned()
    }

    /// Make every open of the node fail (reads and writes).
    pub fn make_unavailable(&self, path: impl AsRef<Path>) {
        lock(&self.state)
            .unavailable
            .insert(path.as_ref().to_path_buf());
    }

    /// Make writes to the node fail after a successful open.
    pub fn fail_writes(&self, path: impl AsRef<Path>) {
        lock(&self.state)
            .failing_writes
            .insert(path.as_ref().to_path_buf());
    }

    /// Undo [`make_unavailable`](Self::make_unavailable) and
    /// [`fail_writes`](Self::fail_writes) for the node.
    pub fn restore(&self, path: impl AsRef<Path>) {
        let mut state = lock(&self.state);
        state.unavailable.remove(path.as_ref());
        state.failing_writes.remove(path.as_ref());
    }

    /// Every write attempt, in order.
    pub fn writes(&self) -> Vec<WriteRecord> {
        lock(&self.state).log.clone()
    }

    /// Write attempts that failed, in order.
    pub fn failed_writes(&self) -> Vec<WriteRecord> {
        lock(&self.state)
            .log
            .iter()
            .filter(|record| !record.succeeded)
            .cloned()
            .collect()
    }

    /// Number of write attempts so far.
    pub fn write_count(&self) -> usize {
        lock(&self.state).log.len()
    }

    /// Values successfully written to a node, newline stripped, in order.
    pub fn values_written(&self, path: impl AsRef<Path>) -> Vec<String> {
        lock(&self.state)
            .log
            .iter()
            .filter(|record| record.succeeded && record.path == path.as_ref())
            .map(|record| record.line.trim_end_matches('\n').to_string())
            .collect()
    }

    /// Last line successfully written to a node, newline included.
    pub fn last_write(&self, path: impl AsRef<Path>) -> Option<String> {
        lock(&self.state)
            .log
            .iter()
            .rev()
            .find(|record| record.succeeded && record.path == path.as_ref())
            .map(|record| record.line.clone())
    }

    /// Forget the write log, keeping node contents.
    pub fn clear_writes(&self) {
        lock(&self.state).log.clear();
    }
}
