//! Button backlight controller.

use std::path::PathBuf;

use lights_core::LightState;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::brightness::rgb_to_brightness;
use crate::report::WriteSession;
use lights_hardware::ControlFiles;

/// Set of button backlights present on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ButtonMask(u8);

impl ButtonMask {
    pub const NONE: ButtonMask = ButtonMask(0);
    pub const BUTTON_1: ButtonMask = ButtonMask(1 << 0);
    pub const BUTTON_2: ButtonMask = ButtonMask(1 << 1);
    pub const ALL: ButtonMask = ButtonMask(Self::BUTTON_1.0 | Self::BUTTON_2.0);

    /// Mask of the button at `index` (0 or 1).
    pub fn for_index(index: usize) -> ButtonMask {
        match index {
            0 => Self::BUTTON_1,
            1 => Self::BUTTON_2,
            _ => Self::NONE,
        }
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: ButtonMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl std::ops::BitOr for ButtonMask {
    type Output = ButtonMask;

    fn bitor(self, rhs: ButtonMask) -> ButtonMask {
        ButtonMask(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ButtonMask {
    fn bitor_assign(&mut self, rhs: ButtonMask) {
        self.0 |= rhs.0;
    }
}

impl Serialize for ButtonMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

/// Write the brightness of `state` to every present button.
///
/// Every present button is written even after a failure.
pub(crate) fn drive_buttons<F: ControlFiles>(
    writes: &mut WriteSession<'_, F>,
    nodes: &[PathBuf; 2],
    present: ButtonMask,
    state: &LightState,
) -> u32 {
    let brightness = rgb_to_brightness(state.color);
    debug!("buttons {:#04b} <- {}", present.bits(), brightness);

    for (index, node) in nodes.iter().enumerate() {
        if present.contains(ButtonMask::for_index(index)) {
            writes.write_int(node, i64::from(brightness));
        }
    }

    brightness
}
