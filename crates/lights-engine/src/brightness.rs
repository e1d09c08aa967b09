//! Color to brightness conversion.

use lights_core::Color;
use lights_core::constants::DEFAULT_MAX_BRIGHTNESS;

/// Perceived brightness of the RGB portion of `color`, in `0..=255`.
///
/// The alpha byte is ignored.
///
/// # Examples
///
/// ```
/// use lights_core::Color;
/// use lights_engine::brightness::rgb_to_brightness;
///
/// assert_eq!(rgb_to_brightness(Color::from_argb(0x00FF_0000)), 76);
/// assert_eq!(rgb_to_brightness(Color::from_argb(0xFFFF_FFFF)), 255);
/// ```
pub fn rgb_to_brightness(color: Color) -> u32 {
    color.luma()
}

/// Rescale a `0..=255` brightness into a panel range of `0..=max_brightness`.
///
/// Identity when the panel uses the default 255 range.
///
/// # Examples
///
/// ```
/// use lights_engine::brightness::scale_to_panel_max;
///
/// assert_eq!(scale_to_panel_max(128, 255), 128);
/// assert_eq!(scale_to_panel_max(255, 4095), 4095);
/// assert_eq!(scale_to_panel_max(128, 4095), 2055);
/// ```
pub fn scale_to_panel_max(brightness: u32, max_brightness: u32) -> u32 {
    if max_brightness == DEFAULT_MAX_BRIGHTNESS {
        return brightness;
    }
    let scaled = u64::from(brightness) * u64::from(max_brightness) / u64::from(DEFAULT_MAX_BRIGHTNESS);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Apply the notification brightness override carried in the alpha byte.
///
/// An alpha strictly between 0 and 255 dims each nonzero channel by
/// `alpha / 255` and the result is returned without alpha. Zero channels stay
/// zero. Alpha 0 or 255 means no override and the color is returned as is.
///
/// # Examples
///
/// ```
/// use lights_core::Color;
/// use lights_engine::brightness::scale_notification_color;
///
/// let dimmed = scale_notification_color(Color::from_argb(0x80FF_0000));
/// assert_eq!(dimmed, Color::from_argb(0x0080_0000));
///
/// let untouched = Color::from_argb(0xFF00_FF00);
/// assert_eq!(scale_notification_color(untouched), untouched);
/// ```
pub fn scale_notification_color(color: Color) -> Color {
    let alpha = color.alpha();
    if alpha == 0 || alpha == u8::MAX {
        return color;
    }

    let scale = |channel: u8| -> u8 {
        if channel == 0 {
            return 0;
        }
        // channel * alpha / 255 < 256 since alpha < 255
        (u32::from(channel) * u32::from(alpha) / 255) as u8
    };

    Color::from_channels(0, scale(color.red()), scale(color.green()), scale(color.blue()))
}
