use super::popover::styled_text;
use crate::theme::Theme;
use eframe::egui;

/// Drop-down picker over a fixed set of options
///
/// Wraps `egui::ComboBox`: the closed box takes `.select-trigger`, the open
/// list `.select-content` and each option `.select-item`.
pub struct Select<'a, T> {
    id_salt: egui::Id,
    options: &'a [T],
    label_of: fn(&T) -> String,
    theme: &'a Theme,
}

impl<'a, T: PartialEq + Clone> Select<'a, T> {
    pub fn new(
        id_salt: impl std::hash::Hash,
        options: &'a [T],
        label_of: fn(&T) -> String,
        theme: &'a Theme,
    ) -> Self {
        Self {
            id_salt: egui::Id::new(("select", id_salt)),
            options,
            label_of,
            theme,
        }
    }

    /// Show the picker; returns true when `current` changed
    pub fn show(self, ui: &mut egui::Ui, current: &mut T) -> bool {
        let ctx = ui.ctx().clone();
        let trigger = self.theme.style(".select-trigger", &ctx);
        let content = self.theme.style(".select-content", &ctx);
        let item = self.theme.style(".select-item", &ctx);

        let mut changed = false;
        ui.scope(|ui| {
            let visuals = ui.visuals_mut();
            if let Some(fill) = trigger.background_color {
                visuals.widgets.inactive.weak_bg_fill = fill;
                visuals.widgets.inactive.bg_fill = fill;
            }
            if let Some(border) = trigger.border_color {
                visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, border);
            }
            if let Some(fill) = content.background_color {
                visuals.window_fill = fill;
            }
            if let Some(border) = content.border_color {
                visuals.window_stroke = egui::Stroke::new(1.0, border);
            }

            let selected_text = styled_text(&(self.label_of)(current), trigger.text_color);
            let mut combo = egui::ComboBox::from_id_salt(self.id_salt).selected_text(selected_text);
            if let Some(width) = trigger.width {
                combo = combo.width(width);
            }

            combo.show_ui(ui, |ui| {
                for option in self.options {
                    let text = styled_text(&(self.label_of)(option), item.text_color);
                    if ui.selectable_label(option == current, text).clicked() && option != current {
                        *current = option.clone();
                        changed = true;
                    }
                }
            });
        });

        changed
    }
}
