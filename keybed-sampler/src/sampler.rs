use crate::loader::SampleBank;
use crate::pitch::interval_to_ratio;
use crate::sample_loader::SampleData;

/// Furthest interval searched for a neighbouring sample, in semitones
const MAX_SEARCH_INTERVAL: i16 = 96;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerOptions {
    /// Release time in seconds
    pub release: f32,
    /// Attack time in seconds
    pub attack: f32,
    pub gain: f32,
    pub max_voices: usize,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            release: 1.0,
            attack: 0.0,
            gain: 0.8,
            max_voices: 32,
        }
    }
}

/// One recorded pitch
struct Zone {
    root_key: u8,
    data: SampleData,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EnvelopePhase {
    Attack,
    Sustain,
    Release,
}

/// Active voice playing a zone
#[derive(Clone)]
struct Voice {
    zone_index: usize,
    note: u8,
    playhead: f64,
    /// Samples of source material per source sample at the root pitch
    pitch_ratio: f64,
    is_active: bool,
    started_at: u64,

    envelope_phase: EnvelopePhase,
    envelope_value: f32,
    release_step: f32,
}

impl Voice {
    fn idle() -> Self {
        Self {
            zone_index: 0,
            note: 0,
            playhead: 0.0,
            pitch_ratio: 1.0,
            is_active: false,
            started_at: 0,
            envelope_phase: EnvelopePhase::Sustain,
            envelope_value: 0.0,
            release_step: 0.0,
        }
    }
}

/// Polyphonic nearest-sample piano
///
/// Each note plays the recorded zone closest in pitch, resampled by
/// 2^(interval/12). Voices are preallocated so note handling never allocates
/// on the audio thread.
pub struct Sampler {
    zones: Vec<Zone>,
    /// MIDI note -> zone index for notes that were recorded directly
    zone_for_key: [Option<usize>; 128],
    voices: Vec<Voice>,
    options: SamplerOptions,
    note_counter: u64,
}

impl Sampler {
    pub fn new(bank: SampleBank, options: SamplerOptions) -> Self {
        let mut zone_for_key = [None; 128];
        let zones: Vec<Zone> = bank
            .zones
            .into_iter()
            .map(|z| Zone {
                root_key: z.root_key.min(127),
                data: z.data,
            })
            .collect();

        for (index, zone) in zones.iter().enumerate() {
            zone_for_key[zone.root_key as usize] = Some(index);
        }

        let max_voices = options.max_voices.max(1);

        Self {
            zones,
            zone_for_key,
            voices: vec![Voice::idle(); max_voices],
            options,
            note_counter: 0,
        }
    }

    pub fn options(&self) -> &SamplerOptions {
        &self.options
    }

    /// Closest recorded zone and the interval from its root to `note`
    ///
    /// Searches outward one semitone at a time, trying the higher neighbour
    /// before the lower one at equal distance.
    pub fn closest_zone(&self, note: u8) -> Option<(usize, i16)> {
        for interval in 0..=MAX_SEARCH_INTERVAL {
            for candidate in [note as i16 + interval, note as i16 - interval] {
                if !(0..128).contains(&candidate) {
                    continue;
                }
                if let Some(index) = self.zone_for_key[candidate as usize] {
                    return Some((index, note as i16 - candidate));
                }
            }
        }
        None
    }

    /// Trigger a note
    pub fn note_on(&mut self, note: u8) {
        let Some((zone_index, interval)) = self.closest_zone(note) else {
            return;
        };

        // Free voice first, otherwise steal the oldest
        let voice_index = self
            .voices
            .iter()
            .position(|v| !v.is_active)
            .or_else(|| {
                self.voices
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, v)| v.started_at)
                    .map(|(i, _)| i)
            })
            .unwrap_or(0);

        self.note_counter += 1;
        let (envelope_phase, envelope_value) = if self.options.attack > 0.0 {
            (EnvelopePhase::Attack, 0.0)
        } else {
            (EnvelopePhase::Sustain, 1.0)
        };

        self.voices[voice_index] = Voice {
            zone_index,
            note,
            playhead: 0.0,
            pitch_ratio: interval_to_ratio(interval as i32),
            is_active: true,
            started_at: self.note_counter,
            envelope_phase,
            envelope_value,
            release_step: 0.0,
        };
    }

    /// Release every voice playing `note`
    pub fn note_off(&mut self, note: u8, sample_rate: u32) {
        let release = self.options.release;
        for voice in &mut self.voices {
            if voice.is_active && voice.note == note && voice.envelope_phase != EnvelopePhase::Release
            {
                start_release(voice, release, sample_rate);
            }
        }
    }

    /// Release every sounding voice
    pub fn all_notes_off(&mut self, sample_rate: u32) {
        let release = self.options.release;
        for voice in &mut self.voices {
            if voice.is_active && voice.envelope_phase != EnvelopePhase::Release {
                start_release(voice, release, sample_rate);
            }
        }
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active).count()
    }

    /// Render into an interleaved buffer of `channels` channels
    pub fn process(&mut self, output: &mut [f32], channels: usize, sample_rate: u32) {
        output.fill(0.0);

        let channels = channels.max(1);
        let frames = output.len() / channels;
        let gain = self.options.gain;
        let attack_step = if self.options.attack > 0.0 {
            1.0 / (self.options.attack * sample_rate as f32)
        } else {
            1.0
        };

        for voice in &mut self.voices {
            if !voice.is_active {
                continue;
            }

            let Some(zone) = self.zones.get(voice.zone_index) else {
                voice.is_active = false;
                continue;
            };
            let data = &zone.data.samples;
            let speed = voice.pitch_ratio * (zone.data.sample_rate as f64 / sample_rate as f64);

            for frame in 0..frames {
                let index = voice.playhead as usize;
                if index >= data.len() {
                    voice.is_active = false;
                    break;
                }

                // Linear interpolation
                let frac = (voice.playhead - index as f64) as f32;
                let s1 = data[index];
                let s2 = data.get(index + 1).copied().unwrap_or(0.0);
                let sample = s1 + (s2 - s1) * frac;

                match voice.envelope_phase {
                    EnvelopePhase::Attack => {
                        voice.envelope_value += attack_step;
                        if voice.envelope_value >= 1.0 {
                            voice.envelope_value = 1.0;
                            voice.envelope_phase = EnvelopePhase::Sustain;
                        }
                    }
                    EnvelopePhase::Sustain => {}
                    EnvelopePhase::Release => {
                        voice.envelope_value -= voice.release_step;
                        if voice.envelope_value <= 0.0 {
                            voice.envelope_value = 0.0;
                            voice.is_active = false;
                        }
                    }
                }

                let out = sample * voice.envelope_value * gain;
                for ch in 0..channels {
                    output[frame * channels + ch] += out;
                }

                if !voice.is_active {
                    break;
                }
                voice.playhead += speed;
            }
        }
    }
}

/// Linear fade from the current level to silence over `release` seconds
fn start_release(voice: &mut Voice, release: f32, sample_rate: u32) {
    voice.envelope_phase = EnvelopePhase::Release;
    let release_samples = release * sample_rate as f32;
    voice.release_step = if release_samples >= 1.0 {
        voice.envelope_value / release_samples
    } else {
        voice.envelope_value.max(f32::EPSILON)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SampleZone;

    fn bank(keys: &[u8]) -> SampleBank {
        SampleBank::new(
            keys.iter()
                .map(|&root_key| SampleZone {
                    note_id: root_key.to_string(),
                    root_key,
                    data: SampleData {
                        samples: vec![0.5; 1000],
                        sample_rate: 1000,
                    },
                })
                .collect(),
        )
    }

    #[test]
    fn test_closest_zone_exact_and_neighbours() {
        // C4, D#4, F#4
        let sampler = Sampler::new(bank(&[60, 63, 66]), SamplerOptions::default());
        assert_eq!(sampler.closest_zone(60), Some((0, 0)));
        assert_eq!(sampler.closest_zone(61), Some((0, 1)));
        assert_eq!(sampler.closest_zone(65), Some((2, -1)));
        assert_eq!(sampler.closest_zone(40), Some((0, -20)));
    }

    #[test]
    fn test_closest_zone_prefers_higher_on_tie() {
        // Equidistant from C4 and D4
        let sampler = Sampler::new(bank(&[60, 62]), SamplerOptions::default());
        assert_eq!(sampler.closest_zone(61), Some((1, -1)));
    }

    #[test]
    fn test_empty_bank_is_silent() {
        let mut sampler = Sampler::new(SampleBank::default(), SamplerOptions::default());
        assert_eq!(sampler.closest_zone(60), None);
        sampler.note_on(60);
        assert_eq!(sampler.active_voices(), 0);
    }

    #[test]
    fn test_voice_stealing_keeps_limit() {
        let options = SamplerOptions {
            max_voices: 4,
            ..Default::default()
        };
        let mut sampler = Sampler::new(bank(&[60]), options);
        for note in 60..70 {
            sampler.note_on(note);
        }
        assert_eq!(sampler.active_voices(), 4);
    }
}
