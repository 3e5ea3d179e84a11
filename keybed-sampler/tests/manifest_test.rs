use keybed_sampler::manifest::{sample_filename, PIANO_RANGE};
use keybed_sampler::pitch::parse_note_id;
use keybed_sampler::SampleManifest;

#[test]
fn test_salamander_covers_piano_range() {
    let manifest = SampleManifest::salamander();

    // C, D#, F# and A in every register, clipped to A0..C8
    assert_eq!(manifest.len(), 30);
    assert_eq!(manifest.release, 1.0);
    assert_eq!(manifest.sampler_options(), keybed_sampler::SamplerOptions::default());
    assert_eq!(
        manifest.base_url,
        "https://tonejs.github.io/audio/salamander/"
    );

    let mut midis: Vec<u8> = manifest
        .files
        .keys()
        .map(|id| parse_note_id(id).expect("manifest ids parse"))
        .collect();
    midis.sort();

    assert_eq!(midis.first(), Some(&21)); // A0
    assert_eq!(midis.last(), Some(&108)); // C8
    assert!(midis.iter().all(|m| PIANO_RANGE.contains(m)));

    // No gap wider than a minor third
    for pair in midis.windows(2) {
        assert_eq!(pair[1] - pair[0], 3, "gap between {} and {}", pair[0], pair[1]);
    }
}

#[test]
fn test_salamander_file_names() {
    let manifest = SampleManifest::salamander();

    assert_eq!(manifest.files.get("A0").map(String::as_str), Some("A0.mp3"));
    assert_eq!(manifest.files.get("D#3").map(String::as_str), Some("Ds3.mp3"));
    assert_eq!(manifest.files.get("F#7").map(String::as_str), Some("Fs7.mp3"));
    assert_eq!(manifest.files.get("C8").map(String::as_str), Some("C8.mp3"));
    assert!(!manifest.files.contains_key("D#8"));

    for (id, file) in &manifest.files {
        assert_eq!(file, &sample_filename(id));
        assert!(!file.contains('#'));
    }
}

#[test]
fn test_manifest_overrides() {
    let manifest = SampleManifest::salamander()
        .with_base_url("http://localhost:8000/piano/")
        .with_release(0.25);

    assert_eq!(manifest.release, 0.25);
    assert_eq!(manifest.sampler_options().release, 0.25);
    assert_eq!(
        manifest.url_for("Fs4.mp3"),
        "http://localhost:8000/piano/Fs4.mp3"
    );
}
