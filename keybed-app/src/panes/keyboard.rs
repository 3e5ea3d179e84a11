/// Keyboard Pane - scrollable three-octave piano played with mouse, touch or
/// the computer keyboard
///
/// Owns the keyboard surface and the in-flight sample load. Samples load on a
/// background thread; until they are ready the pane shows a placeholder
/// instead of keys.

use super::{PaneRenderer, SharedPaneState};
use crate::input::{key_events, wheel_delta, KeyEvent};
use crate::theme::{Theme, ThemeMode};
use crate::widgets::piano_key::{hit_test, layout_keys, paint_key, KeyGeometry};
use crate::widgets::{popover, CommandItem, Popover, Select};
use eframe::egui;
use keybed_core::bindings::KEY_BINDINGS;
use keybed_core::surface::KEYBOARD_SCROLL;
use keybed_core::input::WheelDelta;
use keybed_core::{EngineStatus, KeyboardSurface, SamplerBackend};
use keybed_sampler::fetch::fetcher_for;
use keybed_sampler::{AudioSystem, PendingLoad, SampleLoader, SampleManifest};
use std::collections::BTreeMap;
use std::time::Duration;

/// How often the pane checks on the loader while waiting
const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Room left under the keys for the horizontal scrollbar
const SCROLLBAR_MARGIN: f32 = 16.0;

pub struct KeyboardPane {
    surface: KeyboardSurface<AudioSystem>,
    manifest: SampleManifest,
    pending: Option<PendingLoad>,
    /// Unscaled key sizes from the theme
    base_geometry: KeyGeometry,
    /// Sizes used for the last frame
    geometry: KeyGeometry,
    /// Scroll viewport of the last frame, for wheel hit-testing
    viewport: Option<egui::Rect>,
    pointer: KeyPointer,
    window_focused: bool,
}

/// Mouse hover and active touches over the keys
#[derive(Debug, Default)]
struct KeyPointer {
    /// Key under the mouse pointer last frame
    hovered: Option<usize>,
    /// Active touches and the key each one started on
    touches: BTreeMap<egui::TouchId, usize>,
}

impl KeyPointer {
    /// Route one touch event; returns true when the platform default
    /// (mouse emulation) should be suppressed
    fn touch<B: SamplerBackend>(
        &mut self,
        surface: &mut KeyboardSurface<B>,
        id: egui::TouchId,
        phase: egui::TouchPhase,
        key: Option<usize>,
    ) -> bool {
        match phase {
            egui::TouchPhase::Start => {
                let Some(index) = key else {
                    return false;
                };
                self.touches.insert(id, index);
                surface.touch_start(index).prevent_default
            }
            egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                if let Some(index) = self.touches.remove(&id) {
                    surface.touch_end(index);
                }
                false
            }
            egui::TouchPhase::Move => false,
        }
    }

    /// egui derives pointer events from touches; those must not press keys twice
    fn suppresses_mouse(&self, touch_prevented: bool) -> bool {
        touch_prevented || !self.touches.is_empty()
    }

    /// Route one frame of mouse state
    fn mouse<B: SamplerBackend>(
        &mut self,
        surface: &mut KeyboardSurface<B>,
        hovered: Option<usize>,
        pressed: bool,
        released: bool,
    ) {
        if let Some(previous) = self.hovered {
            if hovered != Some(previous) {
                surface.pointer_leave(previous);
            }
        }
        self.hovered = hovered;

        if let Some(index) = hovered {
            if pressed {
                surface.pointer_down(index);
            }
            if released {
                surface.pointer_up(index);
            }
        }
    }
}

/// Feed wheel motion to the surface; true when any of it was taken
fn route_wheel<B: SamplerBackend>(
    surface: &mut KeyboardSurface<B>,
    wheels: impl IntoIterator<Item = WheelDelta>,
) -> bool {
    wheels
        .into_iter()
        .fold(false, |prevented, wheel| surface.handle_wheel(wheel).prevent_default || prevented)
}

/// Drop this frame's scroll motion so the scroll area does not apply it again
fn consume_scroll(input: &mut egui::InputState) {
    input.smooth_scroll_delta = egui::Vec2::ZERO;
    input.raw_scroll_delta = egui::Vec2::ZERO;
}

impl KeyboardPane {
    pub fn new(manifest: SampleManifest, theme: &Theme) -> Self {
        let mut surface = KeyboardSurface::new();
        surface.mount();

        let geometry = KeyGeometry::from_theme(theme);
        let mut pane = Self {
            surface,
            manifest,
            pending: None,
            base_geometry: geometry,
            geometry,
            viewport: None,
            pointer: KeyPointer::default(),
            window_focused: true,
        };
        pane.start_loading();
        pane
    }

    /// Kick off a background load of every sample in the manifest
    fn start_loading(&mut self) {
        self.surface.begin_loading();

        let spawned = fetcher_for(&self.manifest.base_url)
            .and_then(|fetcher| SampleLoader::spawn(self.manifest.clone(), fetcher));

        match spawned {
            Ok(pending) => self.pending = Some(pending),
            Err(e) => self.surface.fail_loading(e.to_string()),
        }
    }

    /// Install the sampler once the loader has delivered
    fn poll_loader(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };

        let Some(result) = pending.try_take() else {
            ctx.request_repaint_after(LOAD_POLL_INTERVAL);
            return;
        };
        self.pending = None;

        let bank = match result {
            Ok(bank) => bank,
            Err(e) => {
                self.surface.fail_loading(e.to_string());
                return;
            }
        };

        match AudioSystem::to_destination(bank, self.manifest.sampler_options()) {
            Ok(audio) => self.surface.install_engine(audio),
            Err(e) => self.surface.fail_loading(e.to_string()),
        }
        ctx.request_repaint();
    }

    /// Release every held key when the window loses focus, since the key-up
    /// events will go elsewhere
    fn track_focus(&mut self, ctx: &egui::Context) {
        let focused = ctx.input(|i| i.focused);
        if self.window_focused && !focused {
            log::debug!("Window lost focus, releasing held keys");
            self.surface.release_all();
            self.pointer.touches.clear();
        }
        self.window_focused = focused;
    }

    fn handle_keyboard_input(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        for event in ctx.input(|i| key_events(&i.events)) {
            match event {
                KeyEvent::Down(input) => {
                    self.surface.dispatch_key_down(&input);
                }
                KeyEvent::Up(input) => {
                    self.surface.dispatch_key_up(&input);
                }
            }
        }
    }

    /// Turn vertical wheel motion over the keys into horizontal scrolling
    fn handle_wheel(&mut self, ui: &egui::Ui) {
        let Some(viewport) = self.viewport else {
            return;
        };
        if !ui.rect_contains_pointer(viewport) {
            return;
        }

        let page = viewport.size();
        let wheels: Vec<_> = ui.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::MouseWheel { unit, delta, .. } => Some(wheel_delta(*unit, *delta, page)),
                    _ => None,
                })
                .collect()
        });

        if route_wheel(&mut self.surface, wheels) {
            ui.ctx().input_mut(consume_scroll);
        }
    }

    /// Mouse and touch presses on the keys
    fn handle_pointer(&mut self, ui: &egui::Ui, area: egui::Rect, rects: &[egui::Rect]) {
        let touches: Vec<_> = ui.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Touch { id, phase, pos, .. } => Some((*id, *phase, *pos)),
                    _ => None,
                })
                .collect()
        });

        let mut touch_prevented = false;
        for (id, phase, pos) in touches {
            let key = Some(pos)
                .filter(|pos| area.contains(*pos))
                .and_then(|pos| hit_test(self.surface.keys(), rects, pos));
            touch_prevented |= self.pointer.touch(&mut self.surface, id, phase, key);
        }

        if self.pointer.suppresses_mouse(touch_prevented) {
            return;
        }

        let (pos, pressed, released) = ui.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
            )
        });

        let hovered = pos
            .filter(|_| ui.rect_contains_pointer(area))
            .and_then(|pos| hit_test(self.surface.keys(), rects, pos));
        self.pointer.mouse(&mut self.surface, hovered, pressed, released);
    }

    fn render_keys(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        self.geometry = self
            .base_geometry
            .fit_height(ui.available_height() - SCROLLBAR_MARGIN);
        let geometry = self.geometry;
        let content_width = geometry.content_width(self.surface.keys());

        self.handle_wheel(ui);

        let output = egui::ScrollArea::horizontal()
            .id_salt(KEYBOARD_SCROLL)
            .horizontal_scroll_offset(self.surface.scroll().offset())
            .drag_to_scroll(false)
            .show(ui, |ui| {
                let (rect, _response) = ui.allocate_exact_size(
                    egui::vec2(content_width, geometry.white_height),
                    egui::Sense::click_and_drag(),
                );
                let rects = layout_keys(self.surface.keys(), rect.min, &geometry);
                let area = rect.intersect(ui.clip_rect());

                self.handle_pointer(ui, area, &rects);

                // White keys first so black keys render on top
                let painter = ui.painter();
                for black in [false, true] {
                    for (key, key_rect) in self.surface.keys().iter().zip(&rects) {
                        if key.is_black() == black && ui.is_rect_visible(*key_rect) {
                            paint_key(painter, *key_rect, key, theme, ui.ctx());
                        }
                    }
                }
            });

        self.viewport = Some(output.inner_rect);
        let scroll = self.surface.scroll_mut();
        scroll.set_extent(output.content_size.x, output.inner_rect.width());
        scroll.set_offset(output.state.offset.x);
    }

    fn render_placeholder(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        let ctx = ui.ctx().clone();
        let status = self.surface.status().clone();

        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            match status {
                EngineStatus::Failed(reason) => {
                    let color = theme
                        .style(".keyboard-error", &ctx)
                        .text_color
                        .unwrap_or(ui.visuals().error_fg_color);
                    ui.label(egui::RichText::new("Could not load piano samples").color(color).strong());
                    ui.label(egui::RichText::new(reason).color(color));
                    ui.add_space(8.0);
                    if ui.button("Retry").clicked() {
                        log::info!("Retrying sample load");
                        self.start_loading();
                    }
                }
                _ => {
                    let color = theme
                        .style(".keyboard-placeholder", &ctx)
                        .text_color
                        .unwrap_or(ui.visuals().weak_text_color());
                    ui.spinner();
                    ui.label(egui::RichText::new("Loading piano samples…").color(color));
                }
            }
        });
    }

    /// Scroll so the key for `note_id` is centred in the viewport
    pub fn scroll_to_key(&mut self, note_id: &str) {
        let Some(index) = self.surface.key_index(note_id) else {
            return;
        };
        let rects = layout_keys(self.surface.keys(), egui::Pos2::ZERO, &self.geometry);
        let viewport_width = self.viewport.map_or(0.0, |r| r.width());
        self.surface
            .scroll_to(rects[index].center().x - viewport_width / 2.0);
    }

    fn render_theme_select(ui: &mut egui::Ui, theme: &mut Theme) {
        let mut mode = theme.mode();
        let changed = Select::new(
            "theme-mode",
            &ThemeMode::ALL,
            |mode: &ThemeMode| mode.label().to_string(),
            theme,
        )
        .show(ui, &mut mode);

        if changed {
            log::info!("Theme mode: {:?}", mode);
            theme.set_mode(mode);
            ui.ctx().set_theme(mode.preference());
        }
    }

    /// Popover listing every computer-keyboard binding; picking one scrolls to it
    fn render_shortcuts(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        let (_, picked) = Popover::new("shortcuts", "Shortcuts", theme).show(ui, |ui| {
            ui.label(egui::RichText::new("Computer keyboard").strong());
            ui.separator();

            let mut picked = None;
            egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                for (physical, note_id) in KEY_BINDINGS {
                    let item = CommandItem::new(note_id, theme).shortcut(physical.to_uppercase());
                    if ui.add(item).clicked() {
                        picked = Some(note_id);
                    }
                }
            });

            if picked.is_some() {
                popover::close(ui);
            }
            picked
        });

        if let Some(note_id) = picked.flatten() {
            self.scroll_to_key(note_id);
        }
    }
}

impl PaneRenderer for KeyboardPane {
    fn render_header(&mut self, ui: &mut egui::Ui, shared: &mut SharedPaneState) -> bool {
        ui.horizontal(|ui| {
            ui.heading(self.name());

            let status = match self.surface.status() {
                EngineStatus::Ready => "Ready",
                EngineStatus::Failed(_) => "Samples unavailable",
                EngineStatus::Loading | EngineStatus::Uninitialized => "Loading…",
            };
            ui.weak(status);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                Self::render_theme_select(ui, shared.theme);
                self.render_shortcuts(ui, shared.theme);
            });
        });
        true
    }

    fn render_content(&mut self, ui: &mut egui::Ui, rect: egui::Rect, shared: &mut SharedPaneState) {
        let ctx = ui.ctx().clone();
        self.poll_loader(&ctx);
        self.track_focus(&ctx);

        if let Some(fill) = shared.theme.style(".keyboard-pane", &ctx).background_color {
            ui.painter().rect_filled(rect, 0.0, fill);
        }

        if self.surface.engine().is_ready() {
            self.handle_keyboard_input(&ctx);
            self.render_keys(ui, shared.theme);
        } else {
            self.render_placeholder(ui, shared.theme);
        }
    }

    fn name(&self) -> &str {
        "Keybed"
    }
}

impl Drop for KeyboardPane {
    fn drop(&mut self) {
        self.surface.release_all();
        self.surface.engine_mut().dispose();
        self.surface.unmount();
    }
}
