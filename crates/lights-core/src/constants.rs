//! Hardware constants for the lights shim.
//!
//! This module collects the fixed numeric parameters of the panel backlight
//! and the indicator LED ramp engine. The LED driver steps through a lookup
//! table of duty-cycle percentages, first upward and then back down, so a
//! single "on" phase consumes the table twice.
//!
//! ```text
//!  duty %
//!  100 |            ___
//!      |          _/   \_
//!   50 |        _/       \_
//!      |      _/           \_
//!    0 |_____/               \______
//!      |<-off->|<-- ramp x2 -->|<-hi->|
//!        pause_lo              pause_hi
//! ```
//!
//! # Usage
//!
//! ```
//! use lights_core::constants::*;
//!
//! // The ramp is traversed up and down during the on phase.
//! let full_ramp_ms = RAMP_STEP_DURATION_MS * RAMP_SIZE as u32 * 2;
//! assert_eq!(full_ramp_ms, 800);
//!
//! assert_eq!(BRIGHTNESS_RAMP.len(), RAMP_SIZE);
//! ```

// ============================================================================
// Brightness Range
// ============================================================================

/// Upper bound of the brightness range used by the light API.
///
/// Panels whose `max_brightness` node reports a different value get their
/// brightness rescaled linearly into the panel range.
pub const DEFAULT_MAX_BRIGHTNESS: u32 = 255;

/// Backlight brightness pinned while the panel enters low-persistence mode.
///
/// The display driver needs a stable, predetermined brightness in this mode,
/// so the requested color is ignored on entry.
pub const DEFAULT_LOW_PERSISTENCE_BRIGHTNESS: u32 = 0x80;

// ============================================================================
// Luma Weights
// ============================================================================

/// Red weight of the integer luma approximation (sums to 256 with G and B).
pub const LUMA_WEIGHT_RED: u32 = 77;

/// Green weight of the integer luma approximation.
pub const LUMA_WEIGHT_GREEN: u32 = 150;

/// Blue weight of the integer luma approximation.
pub const LUMA_WEIGHT_BLUE: u32 = 29;

// ============================================================================
// Indicator LED Ramp
// ============================================================================

/// Number of entries in the LED duty-cycle lookup table.
pub const RAMP_SIZE: usize = 8;

/// Base breathing curve in duty-cycle percent, scaled by LED brightness.
///
/// # Examples
///
/// ```
/// use lights_core::constants::BRIGHTNESS_RAMP;
///
/// assert_eq!(BRIGHTNESS_RAMP.first(), Some(&0));
/// assert_eq!(BRIGHTNESS_RAMP.last(), Some(&100));
/// assert!(BRIGHTNESS_RAMP.windows(2).all(|w| w[0] <= w[1]));
/// ```
pub const BRIGHTNESS_RAMP: [u32; RAMP_SIZE] = [0, 12, 25, 37, 50, 72, 85, 100];

/// Default time spent on each ramp step (milliseconds).
///
/// Shrunk when the requested on time is too short to walk the table up and
/// down at this pace.
pub const RAMP_STEP_DURATION_MS: u32 = 50;

/// Index of the first lookup table entry the ramp starts from.
pub const RAMP_START_INDEX: u32 = 0;

// ============================================================================
// Device File Access
// ============================================================================

/// Maximum number of bytes read when parsing an integer control node.
///
/// Longer content is truncated before parsing.
pub const READ_INT_MAX_BYTES: usize = 10;
