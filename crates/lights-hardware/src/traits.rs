//! Control file trait definitions.
//!
//! The lights engine never touches the filesystem directly. It goes through
//! [`ControlFiles`], which exposes the small set of operations the kernel
//! control nodes need: bounded reads, newline-terminated writes and an
//! existence probe. Implementations only provide those primitives; the
//! integer parsing and formatting rules live in the provided methods so that
//! every implementation agrees on them.

use std::path::Path;
use std::sync::Arc;

use lights_core::constants::READ_INT_MAX_BYTES;

use crate::error::{HardwareError, Result};

/// Access to sysfs/procfs style control nodes.
///
/// Operations are synchronous; control nodes answer immediately under
/// normal operation.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use lights_hardware::mock::MockControlFiles;
/// use lights_hardware::traits::ControlFiles;
///
/// let (files, handle) = MockControlFiles::new();
/// handle.set_contents("/sys/class/leds/lcd-backlight/max_brightness", "4095\n");
///
/// let max = files
///     .read_int(Path::new("/sys/class/leds/lcd-backlight/max_brightness"))
///     .unwrap();
/// assert_eq!(max, 4095);
///
/// files.write_int(Path::new("/sys/class/leds/white/blink"), 1).unwrap();
/// assert_eq!(handle.last_write("/sys/class/leds/white/blink").as_deref(), Some("1\n"));
/// ```
pub trait ControlFiles: Send + Sync {
    /// Read at most `max_len` bytes from the start of the node.
    ///
    /// # Errors
    ///
    /// - [`HardwareError::PathUnavailable`] if the node cannot be opened
    /// - [`HardwareError::IoFailure`] if the read fails
    fn read_prefix(&self, path: &Path, max_len: usize) -> Result<Vec<u8>>;

    /// Read the whole node as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Same as [`read_prefix`](ControlFiles::read_prefix), plus
    /// [`HardwareError::ParseFailure`] for non UTF-8 content.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write `value` followed by a newline, replacing the node content.
    ///
    /// The node is never created.
    ///
    /// # Errors
    ///
    /// - [`HardwareError::PathUnavailable`] if the node cannot be opened
    /// - [`HardwareError::IoFailure`] if the write fails
    fn write_line(&self, path: &Path, value: &str) -> Result<()>;

    /// Whether the node exists.
    fn exists(&self, path: &Path) -> bool;

    /// Read a decimal integer from the node.
    ///
    /// Parsing follows `strtol` base 10 on the first
    /// [`READ_INT_MAX_BYTES`] bytes. A value of zero is reported as a
    /// [`HardwareError::ParseFailure`]: none of the nodes read this way
    /// legitimately hold zero.
    fn read_int(&self, path: &Path) -> Result<i64> {
        let bytes = self.read_prefix(path, READ_INT_MAX_BYTES)?;
        let text = String::from_utf8_lossy(&bytes);

        match parse_leading_int(&text) {
            0 => Err(HardwareError::parse_failure(path, text.trim_end())),
            value => Ok(value),
        }
    }

    /// Write `"<value>\n"` to the node.
    fn write_int(&self, path: &Path, value: i64) -> Result<()> {
        self.write_line(path, &value.to_string())
    }

    /// Write `"<value>\n"` to the node.
    fn write_str(&self, path: &Path, value: &str) -> Result<()> {
        self.write_line(path, value)
    }
}

impl<T: ControlFiles + ?Sized> ControlFiles for Arc<T> {
    fn read_prefix(&self, path: &Path, max_len: usize) -> Result<Vec<u8>> {
        (**self).read_prefix(path, max_len)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        (**self).read_to_string(path)
    }

    fn write_line(&self, path: &Path, value: &str) -> Result<()> {
        (**self).write_line(path, value)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}

/// Parse the leading decimal integer of `text` the way `strtol` does.
///
/// Leading whitespace and one sign are accepted, parsing stops at the first
/// non-digit, and text without digits yields 0. Out-of-range values
/// saturate.
///
/// # Examples
///
/// ```
/// use lights_hardware::traits::parse_leading_int;
///
/// assert_eq!(parse_leading_int("255\n"), 255);
/// assert_eq!(parse_leading_int("  -12abc"), -12);
/// assert_eq!(parse_leading_int("abc"), 0);
/// ```
pub fn parse_leading_int(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(digit - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}
