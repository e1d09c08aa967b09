//! Control file access backed by the real filesystem.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use tracing::trace;

use crate::error::{HardwareError, Result};
use crate::traits::ControlFiles;

/// [`ControlFiles`] over `std::fs`, for sysfs and procfs nodes.
///
/// Nodes are opened for every operation and closed right after, the way
/// kernel attribute files expect to be used.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use lights_hardware::sysfs::SysfsFiles;
/// use lights_hardware::traits::ControlFiles;
///
/// let files = SysfsFiles::new();
/// files.write_int(Path::new("/sys/class/leds/lcd-backlight/brightness"), 128)?;
/// # Ok::<(), lights_hardware::HardwareError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SysfsFiles;

impl SysfsFiles {
    pub fn new() -> Self {
        Self
    }
}

impl ControlFiles for SysfsFiles {
    fn read_prefix(&self, path: &Path, max_len: usize) -> Result<Vec<u8>> {
        let file = File::open(path).map_err(|e| HardwareError::path_unavailable(path, e))?;

        let mut buf = Vec::with_capacity(max_len.min(4096));
        file.take(max_len as u64)
            .read_to_end(&mut buf)
            .map_err(|e| HardwareError::io_failure(path, e))?;

        trace!("read {} bytes from {}", buf.len(), path.display());
        Ok(buf)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let mut file = File::open(path).map_err(|e| HardwareError::path_unavailable(path, e))?;

        let mut content = String::new();
        file.read_to_string(&mut content).map_err(|e| {
            if e.kind() == io::ErrorKind::InvalidData {
                HardwareError::parse_failure(path, "<non utf-8 content>")
            } else {
                HardwareError::io_failure(path, e)
            }
        })?;
        Ok(content)
    }

    fn write_line(&self, path: &Path, value: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| HardwareError::path_unavailable(path, e))?;

        file.write_all(format!("{}\n", value).as_bytes())
            .map_err(|e| HardwareError::io_failure(path, e))?;

        trace!("wrote {:?} to {}", value, path.display());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
