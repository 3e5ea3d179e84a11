//! Platform-neutral input events
//!
//! The GUI layer translates its own events into these before handing them to
//! the keyboard surface, so the press logic can be driven from tests.

/// A physical keyboard event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    /// Lower-case character of the key, e.g. "q" or "2"
    pub key: String,
    /// Set on auto-repeat key-down events
    pub repeat: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            repeat: false,
        }
    }

    pub fn repeated(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            repeat: true,
        }
    }
}

/// Mouse wheel motion in pixels
///
/// Positive `delta_y` means the wheel was turned to scroll content down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelDelta {
    pub delta_x: f32,
    pub delta_y: f32,
}

impl WheelDelta {
    pub fn vertical(delta_y: f32) -> Self {
        Self {
            delta_x: 0.0,
            delta_y,
        }
    }
}

/// What a handler asks of the platform after processing an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResponse {
    /// Suppress the platform's default handling (page scroll, synthetic mouse events)
    pub prevent_default: bool,
}

impl EventResponse {
    pub const IGNORED: Self = Self {
        prevent_default: false,
    };

    pub const PREVENT_DEFAULT: Self = Self {
        prevent_default: true,
    };
}
