use crate::{
    Result,
    constants::{LUMA_WEIGHT_BLUE, LUMA_WEIGHT_GREEN, LUMA_WEIGHT_RED},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 32-bit ARGB color.
///
/// The low 24 bits carry RGB. The alpha byte is not transparency: for the
/// notification light it requests a brightness override, everywhere else it
/// is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(u32);

impl Color {
    /// Fully off.
    pub const OFF: Color = Color(0);

    /// Wrap a raw `0xAARRGGBB` value.
    #[must_use]
    pub const fn from_argb(argb: u32) -> Self {
        Color(argb)
    }

    /// Build a color from its channels.
    #[must_use]
    pub const fn from_channels(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Color(((alpha as u32) << 24) | ((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    /// Build an opaque color (alpha 0xFF) from RGB channels.
    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::from_channels(0xFF, red, green, blue)
    }

    /// Raw `0xAARRGGBB` value.
    #[must_use]
    pub const fn argb(&self) -> u32 {
        self.0
    }

    /// RGB portion with the alpha byte cleared.
    #[must_use]
    pub const fn rgb_bits(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    #[must_use]
    pub const fn alpha(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[must_use]
    pub const fn red(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[must_use]
    pub const fn green(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.0 as u8
    }

    /// A color is lit when any of its RGB channels is nonzero.
    #[must_use]
    pub const fn is_lit(&self) -> bool {
        self.rgb_bits() != 0
    }

    /// Perceived brightness of the RGB portion in `0..=255`.
    ///
    /// Integer luma approximation `(77 R + 150 G + 29 B) >> 8`; alpha is
    /// ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use lights_core::Color;
    ///
    /// assert_eq!(Color::from_argb(0x00FF_FFFF).luma(), 255);
    /// assert_eq!(Color::from_argb(0xFF00_FF00).luma(), 149);
    /// ```
    #[must_use]
    pub const fn luma(&self) -> u32 {
        (LUMA_WEIGHT_RED * self.red() as u32
            + LUMA_WEIGHT_GREEN * self.green() as u32
            + LUMA_WEIGHT_BLUE * self.blue() as u32)
            >> 8
    }
}

impl From<u32> for Color {
    fn from(argb: u32) -> Self {
        Color(argb)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

impl std::str::FromStr for Color {
    type Err = Error;

    /// Parse `0xAARRGGBB`, `#RRGGBB` (opaque), `#AARRGGBB`, or a decimal value.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidColor(s.to_string());

        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return u32::from_str_radix(hex, 16).map(Color).map_err(|_| invalid());
        }

        if let Some(hex) = s.strip_prefix('#') {
            let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
            return match hex.len() {
                6 => Ok(Color(0xFF00_0000 | value)),
                8 => Ok(Color(value)),
                _ => Err(invalid()),
            };
        }

        s.parse::<u32>().map(Color).map_err(|_| invalid())
    }
}

/// Flash behavior requested for a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashMode {
    /// Steady light.
    #[default]
    None,

    /// Blink using `flash_on_ms` / `flash_off_ms`.
    Timed,
}

/// How the display backlight brightness is being managed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrightnessMode {
    /// Brightness chosen by the user.
    #[default]
    User,

    /// Brightness driven by the ambient light sensor.
    Sensor,

    /// Panel in low-persistence (reduced motion blur) mode.
    LowPersistence,
}

impl fmt::Display for BrightnessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BrightnessMode::User => "user",
            BrightnessMode::Sensor => "sensor",
            BrightnessMode::LowPersistence => "low-persistence",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for BrightnessMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(BrightnessMode::User),
            "sensor" => Ok(BrightnessMode::Sensor),
            "low-persistence" | "low_persistence" => Ok(BrightnessMode::LowPersistence),
            other => Err(Error::InvalidBrightnessMode(other.to_string())),
        }
    }
}

/// Requested state of a light.
///
/// Immutable value: callers submit a whole new state, there are no partial
/// updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LightState {
    pub color: Color,
    pub flash_mode: FlashMode,
    pub flash_on_ms: u32,
    pub flash_off_ms: u32,
    pub brightness_mode: BrightnessMode,
}

impl LightState {
    /// Steady light of the given color.
    #[must_use]
    pub fn new(color: impl Into<Color>) -> Self {
        Self {
            color: color.into(),
            ..Self::default()
        }
    }

    /// Light switched off.
    #[must_use]
    pub fn off() -> Self {
        Self::default()
    }

    /// Blink with the given on and off durations.
    #[must_use]
    pub fn with_flash(mut self, on_ms: u32, off_ms: u32) -> Self {
        self.flash_mode = FlashMode::Timed;
        self.flash_on_ms = on_ms;
        self.flash_off_ms = off_ms;
        self
    }

    #[must_use]
    pub fn with_brightness_mode(mut self, mode: BrightnessMode) -> Self {
        self.brightness_mode = mode;
        self
    }

    #[must_use]
    pub fn is_lit(&self) -> bool {
        self.color.is_lit()
    }

    /// Effective `(on, off)` flash durations; zero unless timed.
    #[must_use]
    pub fn flash_timing(&self) -> (u32, u32) {
        match self.flash_mode {
            FlashMode::Timed => (self.flash_on_ms, self.flash_off_ms),
            FlashMode::None => (0, 0),
        }
    }
}

/// Addressable light targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightTarget {
    /// Main display backlight.
    Backlight,

    /// Capacitive button backlights.
    Buttons,

    /// Battery charging indicator (shared LED, lowest priority).
    Battery,

    /// Notification indicator (shared LED).
    Notifications,

    /// Attention indicator (shared LED, highest priority).
    Attention,
}

impl LightTarget {
    /// Every target, in registration order.
    pub const ALL: [LightTarget; 5] = [
        LightTarget::Backlight,
        LightTarget::Buttons,
        LightTarget::Battery,
        LightTarget::Notifications,
        LightTarget::Attention,
    ];

    /// Registration name of the target.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            LightTarget::Backlight => "backlight",
            LightTarget::Buttons => "buttons",
            LightTarget::Battery => "battery",
            LightTarget::Notifications => "notifications",
            LightTarget::Attention => "attention",
        }
    }

    /// Whether the target drives the shared indicator LED.
    #[must_use]
    pub const fn is_indicator(&self) -> bool {
        matches!(
            self,
            LightTarget::Battery | LightTarget::Notifications | LightTarget::Attention
        )
    }
}

impl fmt::Display for LightTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for LightTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LightTarget::ALL
            .into_iter()
            .find(|target| target.name() == s)
            .ok_or_else(|| Error::UnknownTarget(s.to_string()))
    }
}
