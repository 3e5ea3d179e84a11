/// Translation from egui input events to platform-neutral keyboard events

use eframe::egui;
use keybed_core::input::{KeyInput, WheelDelta};

/// Pixels per wheel "line", as browsers report for line-mode wheels
pub const LINE_HEIGHT: f32 = 40.0;

/// The character a key produces, the way a browser reports `KeyboardEvent.key`
///
/// Letters are lowercase unless shift is held; digits and punctuation are
/// returned as-is. Named keys (arrows, Enter, ...) have no character.
pub fn key_to_string(key: egui::Key, shift: bool) -> Option<String> {
    let symbol = key.symbol_or_name();
    let mut chars = symbol.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    let c = match c {
        c if c.is_ascii_alphabetic() && shift => c.to_ascii_uppercase(),
        c if c.is_ascii_alphabetic() => c.to_ascii_lowercase(),
        // egui names the minus key with a typographic minus
        '−' => '-',
        c if c.is_ascii_graphic() => c,
        // Arrow glyphs and other symbols stand for named keys
        _ => return None,
    };
    Some(c.to_string())
}

/// A key press or release relevant to the keyboard surface
#[derive(Debug, Clone, PartialEq)]
pub enum KeyEvent {
    Down(KeyInput),
    Up(KeyInput),
}

/// Extract key events from one frame of egui events
pub fn key_events(events: &[egui::Event]) -> Vec<KeyEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key {
                key,
                pressed,
                repeat,
                modifiers,
                ..
            } => {
                // Shortcuts belong to the window, not the piano. Releases
                // always pass so a key let go during a shortcut still ends.
                if *pressed && (modifiers.ctrl || modifiers.command || modifiers.alt) {
                    return None;
                }
                let input = KeyInput {
                    key: key_to_string(*key, modifiers.shift)?,
                    repeat: *repeat,
                };
                Some(if *pressed {
                    KeyEvent::Down(input)
                } else {
                    KeyEvent::Up(input)
                })
            }
            _ => None,
        })
        .collect()
}

/// Convert an egui wheel event to DOM-style deltas
///
/// egui reports the direction content should move (positive y = up), DOM
/// wheel events the direction of scrolling (positive y = down).
pub fn wheel_delta(unit: egui::MouseWheelUnit, delta: egui::Vec2, page: egui::Vec2) -> WheelDelta {
    let scale = match unit {
        egui::MouseWheelUnit::Point => egui::vec2(1.0, 1.0),
        egui::MouseWheelUnit::Line => egui::vec2(LINE_HEIGHT, LINE_HEIGHT),
        egui::MouseWheelUnit::Page => page,
    };
    WheelDelta {
        delta_x: -delta.x * scale.x,
        delta_y: -delta.y * scale.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_to_string() {
        assert_eq!(key_to_string(egui::Key::Q, false).as_deref(), Some("q"));
        assert_eq!(key_to_string(egui::Key::Q, true).as_deref(), Some("Q"));
        assert_eq!(key_to_string(egui::Key::Num2, false).as_deref(), Some("2"));
        assert_eq!(key_to_string(egui::Key::Enter, false), None);
        assert_eq!(key_to_string(egui::Key::ArrowLeft, false), None);
    }

    #[test]
    fn test_key_events_skip_shortcuts() {
        let events = vec![
            egui::Event::Key {
                key: egui::Key::Z,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            },
            egui::Event::Key {
                key: egui::Key::C,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::CTRL,
            },
            egui::Event::Key {
                key: egui::Key::Z,
                physical_key: None,
                pressed: false,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            },
        ];

        assert_eq!(
            key_events(&events),
            vec![
                KeyEvent::Down(KeyInput::new("z")),
                KeyEvent::Up(KeyInput::new("z")),
            ]
        );
    }

    #[test]
    fn test_key_up_passes_with_modifier_held() {
        let events = vec![
            egui::Event::Key {
                key: egui::Key::Q,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            },
            egui::Event::Key {
                key: egui::Key::Q,
                physical_key: None,
                pressed: false,
                repeat: false,
                modifiers: egui::Modifiers::CTRL,
            },
        ];

        assert_eq!(
            key_events(&events),
            vec![
                KeyEvent::Down(KeyInput::new("q")),
                KeyEvent::Up(KeyInput::new("q")),
            ]
        );
    }

    #[test]
    fn test_wheel_delta_line_units() {
        let wheel = wheel_delta(
            egui::MouseWheelUnit::Line,
            egui::vec2(0.0, -1.0),
            egui::vec2(800.0, 600.0),
        );
        assert_eq!(wheel.delta_y, 40.0);
        assert_eq!(wheel.delta_x, 0.0);
    }

    #[test]
    fn test_wheel_delta_points_flip_sign() {
        let wheel = wheel_delta(
            egui::MouseWheelUnit::Point,
            egui::vec2(3.0, 12.0),
            egui::vec2(800.0, 600.0),
        );
        assert_eq!(wheel.delta_y, -12.0);
        assert_eq!(wheel.delta_x, -3.0);
    }
}
