//! Capacitive key disabler.
//!
//! The navigation keys are disabled by writing `0` to three nodes: the touch
//! panel key switch and the key-event switches of both fingerprint sensor
//! drivers. Writing `1` brings the keys back.

use tracing::{debug, error};

use crate::error::{HardwareError, Result};
use crate::traits::ControlFiles;
use crate::types::KeyDisablerPaths;

/// Boolean passthrough over the key disabler nodes.
///
/// Availability is probed once, at construction.
///
/// # Examples
///
/// ```
/// use lights_hardware::key_disabler::KeyDisabler;
/// use lights_hardware::mock::MockControlFiles;
/// use lights_hardware::types::KeyDisablerPaths;
///
/// let paths = KeyDisablerPaths::default();
/// let (files, handle) = MockControlFiles::new();
/// for path in paths.all() {
///     handle.set_contents(path, "1\n");
/// }
///
/// let keys = KeyDisabler::new(files, paths);
/// assert!(keys.is_supported());
/// assert!(!keys.is_enabled()?);
///
/// keys.set_enabled(true)?;
/// assert!(keys.is_enabled()?);
/// # Ok::<(), lights_hardware::HardwareError>(())
/// ```
#[derive(Debug)]
pub struct KeyDisabler<F> {
    files: F,
    paths: KeyDisablerPaths,
    supported: bool,
}

impl<F: ControlFiles> KeyDisabler<F> {
    /// Probe the nodes and build the disabler.
    pub fn new(files: F, paths: KeyDisablerPaths) -> Self {
        let supported = paths.all().iter().all(|path| files.exists(path));
        debug!("key disabler supported: {}", supported);

        Self {
            files,
            paths,
            supported,
        }
    }

    /// Whether all three nodes were present at construction.
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Whether the keys are currently disabled.
    ///
    /// True as soon as any node reads `0`. Always false when unsupported.
    ///
    /// # Errors
    ///
    /// Returns an error if a node cannot be read or holds a non-integer.
    pub fn is_enabled(&self) -> Result<bool> {
        if !self.supported {
            return Ok(false);
        }

        let mut any_disabled = false;
        for path in self.paths.all() {
            let content = self.files.read_to_string(path).inspect_err(|e| {
                error!("failed to read {}: {}", path.display(), e);
            })?;
            let value: i64 = content
                .trim()
                .parse()
                .map_err(|_| HardwareError::parse_failure(path, content.trim()))?;
            any_disabled |= value == 0;
        }
        Ok(any_disabled)
    }

    /// Disable (`true`) or re-enable (`false`) the keys.
    ///
    /// Nodes are written in order and the first failure stops the sequence.
    ///
    /// # Errors
    ///
    /// - [`HardwareError::Unsupported`] if the nodes are not present
    /// - the first write failure otherwise
    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        if !self.supported {
            return Err(HardwareError::unsupported("key disabler"));
        }

        let value = if enabled { "0" } else { "1" };
        for path in self.paths.all() {
            self.files.write_str(path, value).inspect_err(|e| {
                error!("failed to write {}: {}", path.display(), e);
            })?;
        }
        Ok(())
    }
}
