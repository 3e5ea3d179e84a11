/// Commands sent from the UI thread to the audio thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a note (MIDI number)
    NoteOn(u8),
    /// Release a note (MIDI number)
    NoteOff(u8),
    /// Release every sounding note
    AllNotesOff,
}
