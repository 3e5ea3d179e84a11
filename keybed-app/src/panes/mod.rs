/// Pane implementations for Keybed
///
/// Each pane owns its local state and reaches shared state through
/// SharedPaneState.

use crate::theme::Theme;
use eframe::egui;

pub mod keyboard;

/// State shared by every pane
pub struct SharedPaneState<'a> {
    pub theme: &'a mut Theme,
}

/// Trait for pane rendering
///
/// The header is optional and holds controls; the content area is the body.
pub trait PaneRenderer {
    /// Render the optional header section
    ///
    /// Returns true if a header was rendered
    fn render_header(&mut self, _ui: &mut egui::Ui, _shared: &mut SharedPaneState) -> bool {
        false
    }

    /// Render the main content area
    fn render_content(&mut self, ui: &mut egui::Ui, rect: egui::Rect, shared: &mut SharedPaneState);

    /// Display name of this pane
    fn name(&self) -> &str;
}
