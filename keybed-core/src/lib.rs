// Keybed Core Library
// Keyboard model, input state machines and engine ownership, free of GUI and audio device code

pub mod note;
pub mod bindings;
pub mod key_table;
pub mod input;
pub mod listener;
pub mod engine;
pub mod playable_key;
pub mod scroll;
pub mod surface;

pub use engine::{EngineSlot, EngineStatus, SamplerBackend};
pub use key_table::{build_key_table, default_key_table, Key};
pub use note::{Note, Octave};
pub use playable_key::PlayableKey;
pub use surface::KeyboardSurface;
