use crate::error::LoadError;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use std::io::Cursor;

/// Decoded sample data
#[derive(Debug, Clone)]
pub struct SampleData {
    /// Audio samples (mono, f32 format)
    pub samples: Vec<f32>,
    /// Original sample rate
    pub sample_rate: u32,
}

impl SampleData {
    /// Length in seconds
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decode an in-memory audio file to mono f32 samples
///
/// `name` is used as the format hint (by extension) and in error messages.
pub fn decode_sample(name: &str, bytes: Vec<u8>) -> Result<SampleData, LoadError> {
    let decode_err = |source| LoadError::Decode {
        name: name.to_string(),
        source,
    };

    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    if let Some((_, ext)) = name.rsplit_once('.') {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(decode_err)?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| LoadError::NoAudioTrack(name.to_string()))?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(decode_err)?;

    let mut mono = Vec::new();
    let mut interleaved: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(decode_err(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // A corrupt frame is skipped, the rest of the stream is still usable
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("Skipping bad frame in {}: {}", name, msg);
                continue;
            }
            Err(e) => return Err(decode_err(e)),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);

        let needed = decoded.capacity() * channels;
        if interleaved.as_ref().map_or(true, |buf| buf.capacity() < needed) {
            interleaved = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }

        if let Some(buf) = interleaved.as_mut() {
            buf.copy_interleaved_ref(decoded);
            downmix_into(buf.samples(), channels, &mut mono);
        }
    }

    if mono.is_empty() {
        return Err(LoadError::EmptySample(name.to_string()));
    }

    Ok(SampleData {
        samples: mono,
        sample_rate,
    })
}

/// Average interleaved frames down to one channel
fn downmix_into(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    if channels == 1 {
        out.extend_from_slice(interleaved);
        return;
    }

    out.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_stereo() {
        let mut out = Vec::new();
        downmix_into(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2, &mut out);
        assert_eq!(out, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_downmix_mono_passthrough() {
        let mut out = vec![0.25];
        downmix_into(&[0.1, 0.2], 1, &mut out);
        assert_eq!(out, vec![0.25, 0.1, 0.2]);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let result = decode_sample("C4.mp3", b"definitely not audio".to_vec());
        assert!(result.is_err());
    }
}
