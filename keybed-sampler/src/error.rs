/// Errors raised while fetching and decoding samples
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Sample manifest is empty")]
    EmptyManifest,

    #[error("Invalid note id in sample manifest: {0}")]
    InvalidNote(String),

    #[error("Failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server returned HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: symphonia::core::errors::Error,
    },

    #[error("No audio track found in {0}")]
    NoAudioTrack(String),

    #[error("Sample {0} decoded to zero frames")]
    EmptySample(String),

    #[error("Failed to start the sample loader thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Sample loader exited without a result")]
    LoaderGone,
}

/// Errors raised while opening the audio output
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No output device available")]
    NoOutputDevice,

    #[error("Failed to query output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("Failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Unsupported output sample format {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),
}
