use crate::theme::Theme;
use eframe::egui;

/// Full-width clickable row with an optional right-aligned shortcut hint
///
/// Styled by `.command-item`; hover colors come from `.command-item-hover`
/// and the hint color from `.command-shortcut`.
pub struct CommandItem<'a> {
    label: String,
    shortcut: Option<String>,
    theme: &'a Theme,
}

impl<'a> CommandItem<'a> {
    pub fn new(label: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            label: label.into(),
            shortcut: None,
            theme,
        }
    }

    pub fn shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }
}

impl egui::Widget for CommandItem<'_> {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let ctx = ui.ctx().clone();
        let base = self.theme.style(".command-item", &ctx);
        let hover = self.theme.style(".command-item-hover", &ctx);
        let hint = self.theme.style(".command-shortcut", &ctx);

        let height = base.height.unwrap_or(24.0);
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), height),
            egui::Sense::click(),
        );

        if ui.is_rect_visible(rect) {
            let style = if response.hovered() {
                base.clone().merged(&hover)
            } else {
                base.clone()
            };
            let visuals = ui.style().interact(&response);
            let painter = ui.painter();

            if let Some(fill) = style.background_color {
                painter.rect_filled(rect, style.border_radius.unwrap_or(4.0), fill);
            } else if response.hovered() {
                painter.rect_filled(rect, 4.0, visuals.weak_bg_fill);
            }

            let text_color = style.text_color.unwrap_or(visuals.text_color());
            let font = egui::TextStyle::Button.resolve(ui.style());
            let padding = ui.spacing().button_padding.x;

            painter.text(
                egui::pos2(rect.left() + padding, rect.center().y),
                egui::Align2::LEFT_CENTER,
                &self.label,
                font.clone(),
                text_color,
            );

            if let Some(shortcut) = &self.shortcut {
                painter.text(
                    egui::pos2(rect.right() - padding, rect.center().y),
                    egui::Align2::RIGHT_CENTER,
                    shortcut,
                    font,
                    hint.text_color.unwrap_or(ui.visuals().weak_text_color()),
                );
            }
        }

        response.on_hover_cursor(egui::CursorIcon::PointingHand)
    }
}
