/// Layout and painting of playable keys
///
/// White keys sit side by side; each black key straddles the boundary after
/// the white key before it. Black keys are painted last and hit-tested first
/// because they overlap their neighbours.

use crate::theme::{Style, Theme};
use eframe::egui;
use keybed_core::PlayableKey;

/// Key dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyGeometry {
    pub white_width: f32,
    pub white_height: f32,
    pub black_width: f32,
    pub black_height: f32,
}

impl KeyGeometry {
    /// Black key width relative to white keys
    pub const BLACK_WIDTH_RATIO: f32 = 0.6;
    /// Black key height relative to white keys
    pub const BLACK_HEIGHT_RATIO: f32 = 0.62;

    pub fn new(white_width: f32, white_height: f32) -> Self {
        Self {
            white_width,
            white_height,
            black_width: white_width * Self::BLACK_WIDTH_RATIO,
            black_height: white_height * Self::BLACK_HEIGHT_RATIO,
        }
    }

    /// Sizes from the `.piano-key-white` / `.piano-key-black` theme classes
    pub fn from_theme(theme: &Theme) -> Self {
        let white = theme.style_for(".piano-key-white", false);
        let black = theme.style_for(".piano-key-black", false);

        let mut geometry = Self::new(white.width.unwrap_or(56.0), white.height.unwrap_or(220.0));
        if let Some(w) = black.width {
            geometry.black_width = w;
        }
        if let Some(h) = black.height {
            geometry.black_height = h;
        }
        geometry
    }

    /// Fit the white key height to the available height, keeping proportions
    pub fn fit_height(self, available: f32) -> Self {
        if available <= 0.0 || available >= self.white_height {
            return self;
        }
        let scale = available / self.white_height;
        Self {
            white_width: self.white_width * scale,
            white_height: available,
            black_width: self.black_width * scale,
            black_height: self.black_height * scale,
        }
    }

    /// Total width of a run of keys
    pub fn content_width(&self, keys: &[PlayableKey]) -> f32 {
        keys.iter().filter(|k| !k.is_black()).count() as f32 * self.white_width
    }
}

/// One rect per key, in key order
pub fn layout_keys(keys: &[PlayableKey], origin: egui::Pos2, geometry: &KeyGeometry) -> Vec<egui::Rect> {
    let mut whites_before = 0;
    keys.iter()
        .map(|key| {
            let boundary = origin.x + whites_before as f32 * geometry.white_width;
            if key.is_black() {
                egui::Rect::from_min_size(
                    egui::pos2(boundary - geometry.black_width / 2.0, origin.y),
                    egui::vec2(geometry.black_width, geometry.black_height),
                )
            } else {
                whites_before += 1;
                egui::Rect::from_min_size(
                    egui::pos2(boundary, origin.y),
                    egui::vec2(geometry.white_width, geometry.white_height),
                )
            }
        })
        .collect()
}

/// Index of the key under `pos`, black keys taking priority
pub fn hit_test(keys: &[PlayableKey], rects: &[egui::Rect], pos: egui::Pos2) -> Option<usize> {
    let hit = |black: bool| {
        keys.iter()
            .zip(rects)
            .position(|(key, rect)| key.is_black() == black && rect.contains(pos))
    };
    hit(true).or_else(|| hit(false))
}

fn key_style(key: &PlayableKey, theme: &Theme, ctx: &egui::Context) -> Style {
    let class = if key.is_black() {
        ".piano-key-black"
    } else {
        ".piano-key-white"
    };
    let base = theme.style(class, ctx);
    if key.is_pressed() {
        base.merged(&theme.style(&format!("{}-pressed", class), ctx))
    } else {
        base
    }
}

/// Paint one key with its label
pub fn paint_key(
    painter: &egui::Painter,
    rect: egui::Rect,
    key: &PlayableKey,
    theme: &Theme,
    ctx: &egui::Context,
) {
    let style = key_style(key, theme, ctx);

    let (default_fill, default_text) = match (key.is_black(), key.is_pressed()) {
        (false, false) => (egui::Color32::WHITE, egui::Color32::DARK_GRAY),
        (false, true) => (egui::Color32::from_rgb(100, 150, 255), egui::Color32::BLACK),
        (true, false) => (egui::Color32::BLACK, egui::Color32::LIGHT_GRAY),
        (true, true) => (egui::Color32::from_rgb(50, 100, 200), egui::Color32::WHITE),
    };
    let fill = style.background_color.unwrap_or(default_fill);
    let outline = style.border_color.unwrap_or(egui::Color32::BLACK);
    let text_color = style.text_color.unwrap_or(default_text);
    let radius = style.border_radius.unwrap_or(2.0);

    // Square top edge, rounded bottom
    let corners = egui::CornerRadius {
        nw: 0,
        ne: 0,
        sw: radius as u8,
        se: radius as u8,
    };
    painter.rect_filled(rect, corners, fill);
    painter.rect_stroke(
        rect,
        corners,
        egui::Stroke::new(1.0, outline),
        egui::StrokeKind::Inside,
    );

    // Note name above the optional binding hint, near the bottom edge
    let font = egui::FontId::proportional(if key.is_black() { 10.0 } else { 12.0 });
    let line_height = font.size + 2.0;
    let mut y = rect.bottom() - 8.0;
    if let Some(binding) = key.binding() {
        painter.text(
            egui::pos2(rect.center().x, y),
            egui::Align2::CENTER_BOTTOM,
            format!("({})", binding.to_uppercase()),
            font.clone(),
            text_color,
        );
        y -= line_height;
    }
    painter.text(
        egui::pos2(rect.center().x, y),
        egui::Align2::CENTER_BOTTOM,
        key.id(),
        font,
        text_color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use keybed_core::default_key_table;

    fn keys() -> Vec<PlayableKey> {
        default_key_table().into_iter().map(PlayableKey::new).collect()
    }

    #[test]
    fn test_layout_positions() {
        let keys = keys();
        let geometry = KeyGeometry::new(50.0, 200.0);
        let rects = layout_keys(&keys, egui::Pos2::ZERO, &geometry);
        assert_eq!(rects.len(), 36);

        // C3 at the origin, C#3 straddling the C3/D3 boundary
        assert_eq!(rects[0].min, egui::pos2(0.0, 0.0));
        assert_eq!(rects[1].center().x, 50.0);
        assert_eq!(rects[1].height(), 200.0 * KeyGeometry::BLACK_HEIGHT_RATIO);
        // D3 is the second white key
        assert_eq!(rects[2].min.x, 50.0);

        // 21 white keys in three octaves
        assert_eq!(geometry.content_width(&keys), 21.0 * 50.0);
        assert_eq!(rects[35].max.x, 21.0 * 50.0);
    }

    #[test]
    fn test_black_keys_win_hit_test() {
        let keys = keys();
        let geometry = KeyGeometry::new(50.0, 200.0);
        let rects = layout_keys(&keys, egui::Pos2::ZERO, &geometry);

        // On the C3/D3 boundary near the top: C#3
        assert_eq!(hit_test(&keys, &rects, egui::pos2(48.0, 10.0)), Some(1));
        // Same x below the black key: C3
        assert_eq!(hit_test(&keys, &rects, egui::pos2(48.0, 190.0)), Some(0));
        // Outside the keyboard
        assert_eq!(hit_test(&keys, &rects, egui::pos2(-5.0, 10.0)), None);
    }

    #[test]
    fn test_fit_height_scales_proportionally() {
        let geometry = KeyGeometry::new(50.0, 200.0).fit_height(100.0);
        assert_eq!(geometry.white_width, 25.0);
        assert_eq!(geometry.white_height, 100.0);
        assert_eq!(geometry.black_width, 15.0);

        // Never grows
        let geometry = KeyGeometry::new(50.0, 200.0).fit_height(400.0);
        assert_eq!(geometry.white_height, 200.0);
    }
}
