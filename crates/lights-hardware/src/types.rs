//! Control node locations.
//!
//! Paths are configuration, not protocol: the defaults match the stock
//! kernel layout but any of them can be overridden, and the whole set can be
//! re-rooted under a staging directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default display backlight brightness node.
pub const LCD_BRIGHTNESS_FILE: &str = "/sys/class/leds/lcd-backlight/brightness";
/// Default display backlight maximum brightness node.
pub const LCD_MAX_BRIGHTNESS_FILE: &str = "/sys/class/leds/lcd-backlight/max_brightness";
/// Default framebuffer low-persistence mode node.
pub const PERSISTENCE_FILE: &str = "/sys/class/graphics/fb0/msm_fb_persist_mode";
/// Default first button backlight node.
pub const BUTTON_1_BRIGHTNESS_FILE: &str = "/sys/class/leds/button-backlight/brightness";
/// Default second button backlight node.
pub const BUTTON_2_BRIGHTNESS_FILE: &str = "/sys/class/leds/button-backlight1/brightness";

pub const WHITE_LED_BRIGHTNESS_FILE: &str = "/sys/class/leds/white/brightness";
pub const WHITE_BLINK_FILE: &str = "/sys/class/leds/white/blink";
pub const WHITE_DUTY_PCTS_FILE: &str = "/sys/class/leds/white/duty_pcts";
pub const WHITE_START_IDX_FILE: &str = "/sys/class/leds/white/start_idx";
pub const WHITE_PAUSE_LO_FILE: &str = "/sys/class/leds/white/pause_lo";
pub const WHITE_PAUSE_HI_FILE: &str = "/sys/class/leds/white/pause_hi";
pub const WHITE_RAMP_STEP_MS_FILE: &str = "/sys/class/leds/white/ramp_step_ms";

pub const KEYS_CONTROL_FILE: &str = "/proc/touchpanel/capacitive_keys_enable";
pub const KEYS_FPC_FILE: &str = "/sys/devices/soc/soc:fingerprint_fpc/enable_key_events";
pub const KEYS_GOODIX_FILE: &str = "/sys/devices/soc/soc:fingerprint_goodix/enable_key_events";

fn reroot(root: &Path, path: &Path) -> PathBuf {
    root.join(path.strip_prefix("/").unwrap_or(path))
}

/// Nodes of the indicator LED and its ramp engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorLedPaths {
    /// Steady brightness.
    pub brightness: PathBuf,

    /// Ramp engine enable (0/1).
    pub blink: PathBuf,

    /// Comma separated duty-cycle lookup table.
    pub duty_pcts: PathBuf,

    /// First lookup table index.
    pub start_idx: PathBuf,

    /// Hold time at the low end of the ramp.
    pub pause_lo: PathBuf,

    /// Hold time at the high end of the ramp.
    pub pause_hi: PathBuf,

    /// Time spent on each ramp step.
    pub ramp_step_ms: PathBuf,
}

impl Default for IndicatorLedPaths {
    fn default() -> Self {
        Self {
            brightness: WHITE_LED_BRIGHTNESS_FILE.into(),
            blink: WHITE_BLINK_FILE.into(),
            duty_pcts: WHITE_DUTY_PCTS_FILE.into(),
            start_idx: WHITE_START_IDX_FILE.into(),
            pause_lo: WHITE_PAUSE_LO_FILE.into(),
            pause_hi: WHITE_PAUSE_HI_FILE.into(),
            ramp_step_ms: WHITE_RAMP_STEP_MS_FILE.into(),
        }
    }
}

impl IndicatorLedPaths {
    fn rerooted(&self, root: &Path) -> Self {
        Self {
            brightness: reroot(root, &self.brightness),
            blink: reroot(root, &self.blink),
            duty_pcts: reroot(root, &self.duty_pcts),
            start_idx: reroot(root, &self.start_idx),
            pause_lo: reroot(root, &self.pause_lo),
            pause_hi: reroot(root, &self.pause_hi),
            ramp_step_ms: reroot(root, &self.ramp_step_ms),
        }
    }
}

/// Nodes toggled together to disable the capacitive keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyDisablerPaths {
    /// Touch panel capacitive key switch.
    pub control: PathBuf,

    /// FPC fingerprint sensor key events.
    pub fpc: PathBuf,

    /// Goodix fingerprint sensor key events.
    pub goodix: PathBuf,
}

impl Default for KeyDisablerPaths {
    fn default() -> Self {
        Self {
            control: KEYS_CONTROL_FILE.into(),
            fpc: KEYS_FPC_FILE.into(),
            goodix: KEYS_GOODIX_FILE.into(),
        }
    }
}

impl KeyDisablerPaths {
    /// The nodes in write order.
    pub fn all(&self) -> [&Path; 3] {
        [
            self.control.as_path(),
            self.fpc.as_path(),
            self.goodix.as_path(),
        ]
    }

    fn rerooted(&self, root: &Path) -> Self {
        Self {
            control: reroot(root, &self.control),
            fpc: reroot(root, &self.fpc),
            goodix: reroot(root, &self.goodix),
        }
    }
}

/// Every control node the lights shim touches.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use lights_hardware::types::DevicePaths;
///
/// let paths = DevicePaths::default().rerooted("/tmp/staging");
/// assert_eq!(
///     paths.lcd_brightness,
///     Path::new("/tmp/staging/sys/class/leds/lcd-backlight/brightness")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevicePaths {
    /// Display backlight brightness.
    pub lcd_brightness: PathBuf,

    /// Display backlight maximum brightness (read once at open).
    pub lcd_max_brightness: PathBuf,

    /// Framebuffer low-persistence mode switch.
    pub persistence_mode: PathBuf,

    /// Button backlight nodes, indexed by button.
    pub buttons: [PathBuf; 2],

    /// Shared indicator LED.
    pub indicator: IndicatorLedPaths,

    /// Capacitive key disabler nodes.
    pub key_disabler: KeyDisablerPaths,
}

impl Default for DevicePaths {
    fn default() -> Self {
        Self {
            lcd_brightness: LCD_BRIGHTNESS_FILE.into(),
            lcd_max_brightness: LCD_MAX_BRIGHTNESS_FILE.into(),
            persistence_mode: PERSISTENCE_FILE.into(),
            buttons: [
                BUTTON_1_BRIGHTNESS_FILE.into(),
                BUTTON_2_BRIGHTNESS_FILE.into(),
            ],
            indicator: IndicatorLedPaths::default(),
            key_disabler: KeyDisablerPaths::default(),
        }
    }
}

impl DevicePaths {
    /// Move every path under `root`, keeping its absolute layout.
    pub fn rerooted(&self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            lcd_brightness: reroot(root, &self.lcd_brightness),
            lcd_max_brightness: reroot(root, &self.lcd_max_brightness),
            persistence_mode: reroot(root, &self.persistence_mode),
            buttons: [
                reroot(root, &self.buttons[0]),
                reroot(root, &self.buttons[1]),
            ],
            indicator: self.indicator.rerooted(root),
            key_disabler: self.key_disabler.rerooted(root),
        }
    }
}
