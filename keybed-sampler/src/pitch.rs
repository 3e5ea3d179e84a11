//! Note id to MIDI note number conversion
//!
//! Key ids ("C#4") map to MIDI numbers with C4 = 60. Sharps may be written
//! `#` or `s` (as in sample file names), flats `b`.

/// Parse a note id such as "C4", "F#3", "Ds1" or "Bb-1"
pub fn parse_note_id(id: &str) -> Option<u8> {
    let mut chars = id.chars().peekable();

    let letter = chars.next()?;
    let base: i32 = match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let mut accidental = 0;
    while let Some(&c) = chars.peek() {
        match c {
            '#' | 's' => accidental += 1,
            'b' => accidental -= 1,
            _ => break,
        }
        chars.next();
    }

    let octave: i32 = chars.collect::<String>().parse().ok()?;
    let midi = octave
        .checked_add(1)?
        .checked_mul(12)?
        .checked_add(base + accidental)?;
    u8::try_from(midi).ok().filter(|m| *m <= 127)
}

/// Playback rate that shifts a sample by `semitones`
pub fn interval_to_ratio(semitones: i32) -> f64 {
    2f64.powf(semitones as f64 / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_note_id() {
        assert_eq!(parse_note_id("C4"), Some(60));
        assert_eq!(parse_note_id("A0"), Some(21));
        assert_eq!(parse_note_id("C8"), Some(108));
        assert_eq!(parse_note_id("C#4"), Some(61));
        assert_eq!(parse_note_id("Ds3"), Some(51));
        assert_eq!(parse_note_id("Eb3"), Some(51));
        assert_eq!(parse_note_id("C-1"), Some(0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_note_id(""), None);
        assert_eq!(parse_note_id("H4"), None);
        assert_eq!(parse_note_id("C"), None);
        assert_eq!(parse_note_id("C10"), None);
    }

    #[test]
    fn test_parse_rejects_out_of_range_octaves() {
        assert_eq!(parse_note_id("C2147483647"), None);
        assert_eq!(parse_note_id("B2147483646"), None);
        assert_eq!(parse_note_id("C-2147483648"), None);
        assert_eq!(parse_note_id("C99999999999"), None);
    }

    #[test]
    fn test_octave_ratio() {
        assert!((interval_to_ratio(12) - 2.0).abs() < 1e-12);
        assert!((interval_to_ratio(-12) - 0.5).abs() < 1e-12);
        assert_eq!(interval_to_ratio(0), 1.0);
    }
}
