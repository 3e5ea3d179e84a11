//! Computer keyboard to note mapping
//!
//! Two octaves of playable keys: the bottom letter row plus home row for
//! octave 3 and the top letter row plus number row for octave 4, laid out so
//! that sharps sit one row above their naturals like on a piano.
//!
//! Values must stay unique. The label shown on a piano key is found by a
//! reverse lookup, which is only well defined while no two physical keys
//! share a note.

/// Physical key (lower-case character as reported by the keyboard) -> key id
pub const KEY_BINDINGS: [(&str, &str); 24] = [
    ("z", "C3"),
    ("s", "C#3"),
    ("x", "D3"),
    ("d", "D#3"),
    ("c", "E3"),
    ("v", "F3"),
    ("g", "F#3"),
    ("b", "G3"),
    ("h", "G#3"),
    ("n", "A3"),
    ("j", "A#3"),
    ("m", "B3"),
    ("q", "C4"),
    ("2", "C#4"),
    ("w", "D4"),
    ("3", "D#4"),
    ("e", "E4"),
    ("r", "F4"),
    ("5", "F#4"),
    ("t", "G4"),
    ("6", "G#4"),
    ("y", "A4"),
    ("7", "A#4"),
    ("u", "B4"),
];

/// Key id played by a physical key, matched by exact string equality
pub fn note_for_binding(physical: &str) -> Option<&'static str> {
    KEY_BINDINGS
        .iter()
        .find(|(key, _)| *key == physical)
        .map(|(_, note)| *note)
}

/// Physical key bound to a key id, if any
///
/// "D#3" and "Eb3" are different strings here; only the spelling used by
/// the key table matches.
pub fn binding_for_note(key_id: &str) -> Option<&'static str> {
    KEY_BINDINGS
        .iter()
        .find(|(_, note)| *note == key_id)
        .map(|(key, _)| *key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_values_are_unique() {
        let values: HashSet<_> = KEY_BINDINGS.iter().map(|(_, v)| *v).collect();
        assert_eq!(values.len(), KEY_BINDINGS.len());
    }

    #[test]
    fn test_physical_keys_are_unique() {
        let keys: HashSet<_> = KEY_BINDINGS.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.len(), KEY_BINDINGS.len());
    }

    #[test]
    fn test_lookup_both_directions() {
        assert_eq!(note_for_binding("q"), Some("C4"));
        assert_eq!(binding_for_note("C4"), Some("q"));
        assert_eq!(binding_for_note("Eb3"), None);
        assert_eq!(note_for_binding("Q"), None);
    }
}
