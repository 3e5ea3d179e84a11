//! Pitch classes and registers
//!
//! Notes are kept in semitone order so a key table can be generated by
//! walking `Note::ALL` once per octave.

/// Octave register index (C4 is middle C)
pub type Octave = u8;

/// One of the 12 pitch classes, in semitone order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Note {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Note {
    /// All pitch classes from C to B
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::CSharp,
        Note::D,
        Note::DSharp,
        Note::E,
        Note::F,
        Note::FSharp,
        Note::G,
        Note::GSharp,
        Note::A,
        Note::ASharp,
        Note::B,
    ];

    /// Display name with a `#` sharp marker
    pub fn name(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::CSharp => "C#",
            Note::D => "D",
            Note::DSharp => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::FSharp => "F#",
            Note::G => "G",
            Note::GSharp => "G#",
            Note::A => "A",
            Note::ASharp => "A#",
            Note::B => "B",
        }
    }

    /// Semitone index above C (0..=11)
    pub fn semitone(self) -> u8 {
        self as u8
    }

    /// Black keys are exactly the notes spelled with a sharp
    pub fn is_black(self) -> bool {
        self.name().contains('#')
    }
}

impl std::fmt::Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semitone_order() {
        for (i, note) in Note::ALL.iter().enumerate() {
            assert_eq!(note.semitone() as usize, i);
        }
    }

    #[test]
    fn test_five_black_notes_per_octave() {
        let black: Vec<_> = Note::ALL.iter().filter(|n| n.is_black()).collect();
        assert_eq!(black.len(), 5);
        assert!(!Note::E.is_black());
        assert!(Note::FSharp.is_black());
    }
}
