//! Integration tests for rendering stems and writing them as WAV files.

use chordloom_backend_audio::{mix_parts, wav};
use chordloom_spec::{NoteEvent, PartSet, RenderOptions, Tempo};

fn parts() -> PartSet {
    let melody = (0..8)
        .map(|i| NoteEvent::new(72 + (i % 3), i as f64 * 0.5, i as f64 * 0.5 + 0.5, 96))
        .collect();
    let bass = vec![NoteEvent::new(45, 0.0, 2.0, 104), NoteEvent::new(43, 2.0, 4.0, 104)];
    let drums = (0..4)
        .map(|i| NoteEvent::new(if i % 2 == 0 { 36 } else { 38 }, i as f64, i as f64 + 0.25, 110))
        .collect();
    PartSet::new()
        .with_part("melody", melody)
        .with_part("bass", bass)
        .with_part("drums", drums)
}

fn options() -> RenderOptions {
    RenderOptions {
        sample_rate: 22_050,
        ..Default::default()
    }
}

#[test]
fn test_stems_and_mix_written() {
    let dir = tempfile::tempdir().unwrap();
    let tempo = Tempo::new(100.0).unwrap();
    let mix = mix_parts(&parts(), tempo, &options()).unwrap();

    for (name, stem) in &mix.stems {
        let path = dir.path().join(format!("demo.{}.wav", name));
        wav::write_mono(&path, stem, mix.stats.sample_rate).unwrap();
        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len() as usize, stem.len());
    }

    let mix_path = dir.path().join("demo.mix.wav");
    wav::write_stereo(&mix_path, &mix.bus, mix.stats.sample_rate).unwrap();
    let reader = hound::WavReader::open(&mix_path).unwrap();
    assert_eq!(reader.spec().channels, 2);
    assert_eq!(reader.spec().sample_rate, 22_050);
    assert_eq!(reader.duration() as usize, mix.bus.len());
}

#[test]
fn test_render_is_byte_identical_across_runs() {
    let tempo = Tempo::new(100.0).unwrap();
    let a = mix_parts(&parts(), tempo, &options()).unwrap();
    let b = mix_parts(&parts(), tempo, &options()).unwrap();
    let wav_a = wav::encode_stereo(&a.bus, 22_050).unwrap();
    let wav_b = wav::encode_stereo(&b.bus, 22_050).unwrap();
    assert_eq!(wav_a.pcm_hash, wav_b.pcm_hash);
    assert_eq!(wav_a.wav_data, wav_b.wav_data);
}

#[test]
fn test_duration_matches_latest_note() {
    // 4 beats at 100 bpm = 2.4 s.
    let tempo = Tempo::new(100.0).unwrap();
    let mix = mix_parts(&parts(), tempo, &options()).unwrap();
    assert_eq!(mix.stats.duration_sec, 2.4);
}
