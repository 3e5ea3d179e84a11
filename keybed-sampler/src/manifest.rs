//! Sample manifests
//!
//! A manifest maps note ids to sample file names under a base URL. The
//! bundled manifest points at the Salamander Grand Piano recordings.

use crate::pitch::parse_note_id;
use crate::sampler::SamplerOptions;
use std::collections::BTreeMap;

/// Lowest and highest notes of an 88-key piano (A0 and C8)
pub const PIANO_RANGE: std::ops::RangeInclusive<u8> = 21..=108;

/// Sampled pitch classes per register, a minor third apart
const SAMPLED_NOTES: [&str; 4] = ["C", "D#", "F#", "A"];

#[derive(Debug, Clone, PartialEq)]
pub struct SampleManifest {
    /// Prefix joined with each file name
    pub base_url: String,
    /// Release time in seconds
    pub release: f32,
    /// Note id -> file name
    pub files: BTreeMap<String, String>,
}

impl SampleManifest {
    pub const SALAMANDER_BASE_URL: &'static str = "https://tonejs.github.io/audio/salamander/";
    pub const DEFAULT_RELEASE: f32 = 1.0;

    /// Salamander Grand Piano, every C, D#, F# and A from A0 to C8
    pub fn salamander() -> Self {
        let files = (0..=8u8)
            .flat_map(|register| {
                SAMPLED_NOTES
                    .iter()
                    .map(move |name| format!("{}{}", name, register))
            })
            .filter(|id| parse_note_id(id).is_some_and(|midi| PIANO_RANGE.contains(&midi)))
            .map(|id| {
                let file = sample_filename(&id);
                (id, file)
            })
            .collect();

        Self {
            base_url: Self::SALAMANDER_BASE_URL.to_string(),
            release: Self::DEFAULT_RELEASE,
            files,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_release(mut self, release: f32) -> Self {
        self.release = release;
        self
    }

    /// Playback options for a sampler built from this manifest
    pub fn sampler_options(&self) -> SamplerOptions {
        SamplerOptions {
            release: self.release.max(0.0),
            ..SamplerOptions::default()
        }
    }

    /// Full location of a sample file
    pub fn url_for(&self, file: &str) -> String {
        if self.base_url.is_empty() || self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, file)
        } else {
            format!("{}/{}", self.base_url, file)
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// File name for a note id ("D#3" -> "Ds3.mp3")
pub fn sample_filename(note_id: &str) -> String {
    format!("{}.mp3", note_id.replace('#', "s"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_filename() {
        assert_eq!(sample_filename("C4"), "C4.mp3");
        assert_eq!(sample_filename("F#2"), "Fs2.mp3");
    }

    #[test]
    fn test_url_join() {
        let manifest = SampleManifest::salamander();
        assert_eq!(
            manifest.url_for("A0.mp3"),
            "https://tonejs.github.io/audio/salamander/A0.mp3"
        );

        let manifest = manifest.with_base_url("/srv/samples");
        assert_eq!(manifest.url_for("A0.mp3"), "/srv/samples/A0.mp3");
    }
}
