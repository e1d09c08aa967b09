//! Lights configuration.
//!
//! Every field has a default matching the stock device, so an empty file is a
//! valid configuration.
//!
//! ```toml
//! low_persistence_brightness = 128
//! ramp_step_ms = 50
//! default_max_brightness = 255
//! buttons = "probe"
//!
//! [paths]
//! lcd_brightness = "/sys/class/leds/lcd-backlight/brightness"
//!
//! [paths.indicator]
//! blink = "/sys/class/leds/white/blink"
//! ```

use std::path::Path;

use lights_core::constants::{
    DEFAULT_LOW_PERSISTENCE_BRIGHTNESS, DEFAULT_MAX_BRIGHTNESS, RAMP_STEP_DURATION_MS,
};
use lights_hardware::DevicePaths;
use serde::{Deserialize, Serialize};

use crate::error::{LightsError, Result};

/// How button backlight presence is decided at open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonDetection {
    /// Both buttons are present.
    #[default]
    AssumeAll,

    /// A button is present when its brightness node exists.
    Probe,
}

/// Lights engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    /// Control node locations
    pub paths: DevicePaths,

    /// Backlight brightness pinned on entering low persistence mode
    pub low_persistence_brightness: u32,

    /// Default time per indicator ramp step, in milliseconds
    pub ramp_step_ms: u32,

    /// Panel maximum used when the max brightness node is unusable
    pub default_max_brightness: u32,

    /// Button presence detection
    pub buttons: ButtonDetection,
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            paths: DevicePaths::default(),
            low_persistence_brightness: DEFAULT_LOW_PERSISTENCE_BRIGHTNESS,
            ramp_step_ms: RAMP_STEP_DURATION_MS,
            default_max_brightness: DEFAULT_MAX_BRIGHTNESS,
            buttons: ButtonDetection::default(),
        }
    }
}

impl LightsConfig {
    /// Configuration with the given node locations
    pub fn new(paths: DevicePaths) -> Self {
        Self {
            paths,
            ..Default::default()
        }
    }

    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`LightsError::Config`] on malformed TOML or invalid values.
    ///
    /// # Examples
    ///
    /// ```
    /// use lights_engine::config::{ButtonDetection, LightsConfig};
    ///
    /// let config = LightsConfig::from_toml_str(r#"
    ///     ramp_step_ms = 40
    ///     buttons = "probe"
    /// "#)?;
    /// assert_eq!(config.ramp_step_ms, 40);
    /// assert_eq!(config.buttons, ButtonDetection::Probe);
    /// assert_eq!(config.low_persistence_brightness, 0x80);
    /// # Ok::<(), lights_engine::LightsError>(())
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LightsConfig =
            toml::from_str(content).map_err(|e| LightsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`LightsError::ConfigIo`] if the file cannot be read, otherwise
    /// the errors of [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LightsError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`LightsError::Config`] for a zero ramp step or panel maximum.
    pub fn validate(&self) -> Result<()> {
        if self.ramp_step_ms == 0 {
            return Err(LightsError::Config("ramp_step_ms must be positive".into()));
        }
        if self.default_max_brightness == 0 {
            return Err(LightsError::Config(
                "default_max_brightness must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Move every node under `root`
    pub fn rerooted(mut self, root: impl AsRef<Path>) -> Self {
        self.paths = self.paths.rerooted(root);
        self
    }

    /// Set the low persistence brightness
    pub fn low_persistence_brightness(mut self, brightness: u32) -> Self {
        self.low_persistence_brightness = brightness;
        self
    }

    /// Set the default ramp step duration
    pub fn ramp_step_ms(mut self, step_ms: u32) -> Self {
        self.ramp_step_ms = step_ms;
        self
    }

    /// Set the fallback panel maximum
    pub fn default_max_brightness(mut self, max: u32) -> Self {
        self.default_max_brightness = max;
        self
    }

    /// Set how buttons are detected
    pub fn buttons(mut self, detection: ButtonDetection) -> Self {
        self.buttons = detection;
        self
    }
}
