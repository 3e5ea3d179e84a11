use keybed_sampler::engine::SamplerEngine;
use keybed_sampler::loader::{load_bank, SampleZone};
use keybed_sampler::sample_loader::SampleData;
use keybed_sampler::{
    AssetFetcher, LoadError, SampleBank, SampleLoader, SampleManifest, Sampler, SamplerOptions,
};
use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;

const SAMPLE_RATE: u32 = 8000;

/// Serves sample bytes from memory, 404 for anything unknown
struct MemoryFetcher {
    files: HashMap<String, Vec<u8>>,
}

impl AssetFetcher for MemoryFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        self.files
            .get(url)
            .cloned()
            .ok_or_else(|| LoadError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// A short constant-level mono WAV file
fn wav_bytes(frames: usize, level: i16) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..frames {
            writer.write_sample(level).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn test_manifest() -> SampleManifest {
    let files: BTreeMap<String, String> = [("C4", "C4.wav"), ("A4", "A4.wav")]
        .into_iter()
        .map(|(id, file)| (id.to_string(), file.to_string()))
        .collect();

    SampleManifest {
        base_url: "mem://piano/".to_string(),
        release: 0.1,
        files,
    }
}

fn constant_bank(root_keys: &[u8], frames: usize) -> SampleBank {
    SampleBank::new(
        root_keys
            .iter()
            .map(|&root_key| SampleZone {
                note_id: root_key.to_string(),
                root_key,
                data: SampleData {
                    samples: vec![0.5; frames],
                    sample_rate: SAMPLE_RATE,
                },
            })
            .collect(),
    )
}

#[test]
fn test_load_bank_decodes_every_file() {
    let fetcher = MemoryFetcher {
        files: HashMap::from([
            ("mem://piano/C4.wav".to_string(), wav_bytes(800, 8000)),
            ("mem://piano/A4.wav".to_string(), wav_bytes(400, -8000)),
        ]),
    };

    let bank = load_bank(&test_manifest(), &fetcher).unwrap();
    assert_eq!(bank.len(), 2);

    // Sorted by root key
    assert_eq!(bank.zones[0].note_id, "C4");
    assert_eq!(bank.zones[0].root_key, 60);
    assert_eq!(bank.zones[1].root_key, 69);

    assert_eq!(bank.zones[0].data.sample_rate, SAMPLE_RATE);
    assert_eq!(bank.zones[0].data.samples.len(), 800);
    assert_eq!(bank.zones[1].data.samples.len(), 400);
    assert!(bank.zones[0].data.samples.iter().all(|&s| s > 0.0));
    assert!(bank.zones[1].data.samples.iter().all(|&s| s < 0.0));
}

#[test]
fn test_any_missing_file_fails_the_load() {
    let fetcher = MemoryFetcher {
        files: HashMap::from([("mem://piano/C4.wav".to_string(), wav_bytes(800, 8000))]),
    };

    match load_bank(&test_manifest(), &fetcher) {
        Err(LoadError::HttpStatus { url, status }) => {
            assert_eq!(url, "mem://piano/A4.wav");
            assert_eq!(status, 404);
        }
        other => panic!("expected 404, got {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn test_corrupt_file_fails_the_load() {
    let fetcher = MemoryFetcher {
        files: HashMap::from([
            ("mem://piano/C4.wav".to_string(), wav_bytes(800, 8000)),
            ("mem://piano/A4.wav".to_string(), b"not a wav file".to_vec()),
        ]),
    };

    assert!(load_bank(&test_manifest(), &fetcher).is_err());
}

#[test]
fn test_out_of_range_note_id_fails_the_load() {
    let mut manifest = test_manifest();
    manifest
        .files
        .insert("C2147483647".to_string(), "C4.wav".to_string());
    let fetcher = MemoryFetcher {
        files: HashMap::from([
            ("mem://piano/C4.wav".to_string(), wav_bytes(800, 8000)),
            ("mem://piano/A4.wav".to_string(), wav_bytes(400, -8000)),
        ]),
    };

    match load_bank(&manifest, &fetcher) {
        Err(LoadError::InvalidNote(id)) => assert_eq!(id, "C2147483647"),
        other => panic!("expected invalid note, got {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn test_empty_manifest_is_an_error() {
    let manifest = SampleManifest {
        files: BTreeMap::new(),
        ..test_manifest()
    };
    let fetcher = MemoryFetcher {
        files: HashMap::new(),
    };
    assert!(matches!(
        load_bank(&manifest, &fetcher),
        Err(LoadError::EmptyManifest)
    ));
}

#[test]
fn test_background_loader_delivers_once() {
    let fetcher = MemoryFetcher {
        files: HashMap::from([
            ("mem://piano/C4.wav".to_string(), wav_bytes(100, 8000)),
            ("mem://piano/A4.wav".to_string(), wav_bytes(100, 8000)),
        ]),
    };

    let pending = SampleLoader::spawn(test_manifest(), fetcher).unwrap();
    let bank = pending.wait().unwrap();
    assert_eq!(bank.len(), 2);
}

#[test]
fn test_note_produces_output() {
    let mut sampler = Sampler::new(constant_bank(&[60], 4000), SamplerOptions::default());
    sampler.note_on(60);

    let mut output = vec![0.0f32; 512];
    sampler.process(&mut output, 2, SAMPLE_RATE);

    assert!(output.iter().all(|&s| s > 0.0));
    // Stereo channels carry the same signal
    assert!(output.chunks_exact(2).all(|f| f[0] == f[1]));
    let max = output.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    assert!(max <= 1.0, "Output amplitude too high: {}", max);
}

#[test]
fn test_release_fades_to_silence() {
    let options = SamplerOptions {
        release: 0.05,
        ..Default::default()
    };
    let mut sampler = Sampler::new(constant_bank(&[60], 8000), options);
    sampler.note_on(60);

    let mut output = vec![0.0f32; 64];
    sampler.process(&mut output, 1, SAMPLE_RATE);
    let held = output[63];

    sampler.note_off(60, SAMPLE_RATE);

    // 0.05 s at 8 kHz is 400 samples
    let mut tail = vec![0.0f32; 400];
    sampler.process(&mut tail, 1, SAMPLE_RATE);
    assert!(tail[0] < held);
    assert!(tail.windows(2).all(|w| w[1] <= w[0]));

    let mut after = vec![0.0f32; 64];
    sampler.process(&mut after, 1, SAMPLE_RATE);
    assert!(after.iter().all(|&s| s == 0.0));
    assert_eq!(sampler.active_voices(), 0);
}

#[test]
fn test_voice_ends_with_sample() {
    let mut sampler = Sampler::new(constant_bank(&[60], 100), SamplerOptions::default());
    sampler.note_on(60);

    let mut output = vec![0.0f32; 256];
    sampler.process(&mut output, 1, SAMPLE_RATE);
    assert!(output[..100].iter().all(|&s| s > 0.0));
    assert!(output[100..].iter().all(|&s| s == 0.0));
    assert_eq!(sampler.active_voices(), 0);
}

#[test]
fn test_octave_up_plays_twice_as_fast() {
    // Only C4 recorded; C5 resamples it at ratio 2
    let mut sampler = Sampler::new(constant_bank(&[60], 100), SamplerOptions::default());
    sampler.note_on(72);

    let mut output = vec![0.0f32; 100];
    sampler.process(&mut output, 1, SAMPLE_RATE);
    assert!(output[..50].iter().all(|&s| s > 0.0));
    assert!(output[50..].iter().all(|&s| s == 0.0));
}

#[test]
fn test_engine_applies_queued_commands() {
    let sampler = Sampler::new(constant_bank(&[60], 8000), SamplerOptions::default());
    let (mut engine, mut controller) = SamplerEngine::with_controller(sampler, SAMPLE_RATE, 2);

    controller.note_on(60);
    controller.note_on(64);
    let mut output = vec![0.0f32; 128];
    engine.process(&mut output);
    assert_eq!(engine.sampler().active_voices(), 2);
    assert!(output.iter().any(|&s| s != 0.0));

    controller.all_notes_off();
    let mut output = vec![0.0f32; 2 * SAMPLE_RATE as usize * 2];
    engine.process(&mut output);
    assert_eq!(engine.sampler().active_voices(), 0);
}
