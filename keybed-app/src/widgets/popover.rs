use crate::theme::Theme;
use eframe::egui;

/// Button that toggles a floating panel below itself
///
/// The trigger takes `.popover-trigger`, the panel `.popover-content`.
/// Clicking outside the panel closes it.
pub struct Popover<'a> {
    id: egui::Id,
    label: String,
    theme: &'a Theme,
}

impl<'a> Popover<'a> {
    pub fn new(id_salt: impl std::hash::Hash, label: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            id: egui::Id::new(("popover", id_salt)),
            label: label.into(),
            theme,
        }
    }

    /// Show the trigger, and the panel when open
    pub fn show<R>(
        self,
        ui: &mut egui::Ui,
        add_contents: impl FnOnce(&mut egui::Ui) -> R,
    ) -> (egui::Response, Option<R>) {
        let ctx = ui.ctx().clone();
        let trigger = self.theme.style(".popover-trigger", &ctx);
        let content = self.theme.style(".popover-content", &ctx);

        let mut button = egui::Button::new(styled_text(&self.label, trigger.text_color));
        if let Some(fill) = trigger.background_color {
            button = button.fill(fill);
        }
        if let Some(border) = trigger.border_color {
            button = button.stroke(egui::Stroke::new(1.0, border));
        }
        if let Some(radius) = trigger.border_radius {
            button = button.corner_radius(radius);
        }

        let response = ui.add(button);
        if response.clicked() {
            ui.memory_mut(|m| m.toggle_popup(self.id));
        }

        let inner = ui
            .scope(|ui| {
                let visuals = ui.visuals_mut();
                if let Some(fill) = content.background_color {
                    visuals.window_fill = fill;
                }
                if let Some(border) = content.border_color {
                    visuals.window_stroke = egui::Stroke::new(1.0, border);
                }
                if let Some(text) = content.text_color {
                    visuals.override_text_color = Some(text);
                }

                egui::popup::popup_below_widget(
                    ui,
                    self.id,
                    &response,
                    egui::PopupCloseBehavior::CloseOnClickOutside,
                    |ui| {
                        if let Some(width) = content.width {
                            ui.set_min_width(width);
                        }
                        add_contents(ui)
                    },
                )
            })
            .inner;

        (response, inner)
    }
}

/// Close whichever popover is open
pub fn close(ui: &egui::Ui) {
    ui.memory_mut(|m| m.close_popup());
}

pub(crate) fn styled_text(text: &str, color: Option<egui::Color32>) -> egui::RichText {
    let text = egui::RichText::new(text);
    match color {
        Some(color) => text.color(color),
        None => text,
    }
}
