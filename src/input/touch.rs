//! Raw pointer input as delivered by a platform backend

use serde::Deserialize;

/// Mouse button that starts a gesture
pub const PRIMARY_BUTTON: u32 = 0;

/// Raw pointer event from mouse or touchscreen
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawInput {
    MouseDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: u32,
    },
    MouseMove {
        x: f64,
        y: f64,
    },
    MouseUp {
        #[serde(default)]
        button: u32,
    },
    TouchDown {
        #[serde(default)]
        slot: i32,
        x: f64,
        y: f64,
    },
    TouchMotion {
        #[serde(default)]
        slot: i32,
        x: f64,
        y: f64,
    },
    TouchUp {
        #[serde(default)]
        slot: i32,
    },
    TouchCancel,
}

/// Which kind of device produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Mouse,
    Touch { slot: i32 },
}

impl RawInput {
    /// Device and slot that produced the event, `None` for a cancel, which
    /// applies to every touch slot at once
    pub fn source(&self) -> Option<InputSource> {
        match *self {
            Self::MouseDown { .. } | Self::MouseMove { .. } | Self::MouseUp { .. } => {
                Some(InputSource::Mouse)
            }
            Self::TouchDown { slot, .. }
            | Self::TouchMotion { slot, .. }
            | Self::TouchUp { slot } => Some(InputSource::Touch { slot }),
            Self::TouchCancel => None,
        }
    }
}
