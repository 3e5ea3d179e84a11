/// Playable key table
///
/// The table is the cross product of `Note::ALL` and an inclusive octave
/// range, ordered by octave then semitone. Building it is pure; the keyboard
/// surface builds it once when mounted.

use crate::bindings::KEY_BINDINGS;
use crate::note::{Note, Octave};
use std::collections::HashMap;
use std::ops::RangeInclusive;

/// Octaves rendered as interactive keys
pub const KEY_OCTAVES: RangeInclusive<Octave> = 3..=5;

/// One key of the on-screen keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub note: Note,
    pub octave: Octave,
    pub is_black: bool,
    /// Physical key that plays this key, if one is bound
    pub key_binding: Option<&'static str>,
}

impl Key {
    pub fn new(note: Note, octave: Octave) -> Self {
        Self {
            note,
            octave,
            is_black: note.is_black(),
            key_binding: None,
        }
    }

    /// Note name followed by the octave, e.g. "C#4"
    pub fn id(&self) -> String {
        format!("{}{}", self.note.name(), self.octave)
    }
}

/// Build the ordered key table for the given octaves
pub fn build_key_table(octaves: RangeInclusive<Octave>) -> Vec<Key> {
    // Inverse of the binding map, computed once per build
    let inverse: HashMap<&str, &'static str> = KEY_BINDINGS
        .iter()
        .map(|(physical, note)| (*note, *physical))
        .collect();

    octaves
        .flat_map(|octave| Note::ALL.into_iter().map(move |note| Key::new(note, octave)))
        .map(|mut key| {
            key.key_binding = inverse.get(key.id().as_str()).copied();
            key
        })
        .collect()
}

/// Key table for `KEY_OCTAVES`
pub fn default_key_table() -> Vec<Key> {
    build_key_table(KEY_OCTAVES)
}
