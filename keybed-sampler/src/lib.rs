// Keybed Sampler
//
// Sampled piano playback for the keybed keyboard. Samples are fetched over
// HTTP (or read from a local directory), decoded with symphonia, and played by
// a nearest-sample pitch-shifting sampler running inside a cpal output stream.
// The UI thread talks to the audio thread through a lock-free command queue.

pub mod command;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod manifest;
pub mod pitch;
pub mod sample_loader;
pub mod sampler;
pub mod system;

// Re-export commonly used types
pub use error::{AudioError, LoadError};
pub use fetch::{AssetFetcher, FileFetcher, HttpFetcher};
pub use loader::{PendingLoad, SampleBank, SampleLoader};
pub use manifest::SampleManifest;
pub use sampler::{Sampler, SamplerOptions};
pub use system::AudioSystem;
