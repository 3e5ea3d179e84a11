/// Vertical wheel to horizontal scroll remap
///
/// The keyboard is much wider than it is tall, so a plain mouse wheel is more
/// useful scrolling it sideways. The raw vertical delta is added to the
/// horizontal offset as-is; wheel delta units (line/page) are not converted
/// here.

use crate::input::{EventResponse, WheelDelta};

/// Horizontal scroll position of the keyboard's scroll container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalScroll {
    offset: f32,
    /// Content width minus viewport width; unbounded until the first layout
    max_offset: f32,
}

impl Default for HorizontalScroll {
    fn default() -> Self {
        Self {
            offset: 0.0,
            max_offset: f32::INFINITY,
        }
    }
}

impl HorizontalScroll {
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn max_offset(&self) -> f32 {
        self.max_offset
    }

    /// Update the scrollable range after layout
    pub fn set_extent(&mut self, content_width: f32, viewport_width: f32) {
        self.max_offset = (content_width - viewport_width).max(0.0);
        self.offset = self.offset.clamp(0.0, self.max_offset);
    }

    /// Jump to an absolute offset
    pub fn set_offset(&mut self, offset: f32) {
        self.offset = offset.clamp(0.0, self.max_offset);
    }

    /// Apply a wheel event
    ///
    /// Non-zero vertical motion scrolls sideways and prevents the default
    /// page scroll. Zero vertical motion is left to the platform.
    pub fn apply_wheel(&mut self, wheel: WheelDelta) -> EventResponse {
        if wheel.delta_y == 0.0 {
            return EventResponse::IGNORED;
        }
        self.set_offset(self.offset + wheel.delta_y);
        EventResponse::PREVENT_DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_to_extent() {
        let mut scroll = HorizontalScroll::default();
        scroll.set_extent(1000.0, 400.0);
        scroll.apply_wheel(WheelDelta::vertical(900.0));
        assert_eq!(scroll.offset(), 600.0);
        scroll.apply_wheel(WheelDelta::vertical(-2000.0));
        assert_eq!(scroll.offset(), 0.0);
    }

    #[test]
    fn test_horizontal_only_motion_ignored() {
        let mut scroll = HorizontalScroll::default();
        let response = scroll.apply_wheel(WheelDelta {
            delta_x: 25.0,
            delta_y: 0.0,
        });
        assert!(!response.prevent_default);
        assert_eq!(scroll.offset(), 0.0);
    }
}
