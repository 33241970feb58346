//! End-to-end pipeline tests: anchor -> composition -> MIDI and WAV files.

use chordloom_backend_audio::{mix_parts, wav};
use chordloom_backend_music::midi::{write_parts, write_parts_to_file, MidiTrackOptions};
use chordloom_backend_music::pipeline::{compose, ComposeRequest};
use chordloom_backend_music::song::expand_song;
use chordloom_cli::planner::propose_sections;
use chordloom_spec::{RenderOptions, BASS, DRUMS, MELODY};
use chordloom_tests::{song_request, validate_midi, validate_wav};
use pretty_assertions::assert_eq;

fn render_options(sample_rate: u32) -> RenderOptions {
    RenderOptions {
        sample_rate,
        ..Default::default()
    }
}

#[test]
fn test_full_pipeline_sixty_seconds() {
    let song = song_request(&["Am", "G", "C", "F"], 120.0, 60.0);
    let request = ComposeRequest::new(song, propose_sections(60));
    let composition = compose(&request).unwrap();

    assert_eq!(composition.total_bars, 30);
    assert_eq!(composition.stages, vec!["expand", "voicelead", "motif", "arrange"]);
    assert_eq!(composition.parts.names().collect::<Vec<_>>(), vec![BASS, DRUMS, MELODY]);
    assert_eq!(composition.parts.get(MELODY).unwrap().len(), 120);
    assert_eq!(composition.parts.get(BASS).unwrap().len(), 60);

    for (name, events) in composition.parts.iter() {
        for ev in events {
            assert!(ev.start >= 0.0, "{} starts before zero", name);
            assert!(ev.end > ev.start, "{} has an empty note", name);
            assert!((1..=127).contains(&ev.velocity), "{} velocity {}", name, ev.velocity);
            assert!(ev.end <= 30.0 * 4.0 + 1e-9, "{} runs past the song", name);
        }
    }
    for ev in composition.parts.get(BASS).unwrap() {
        assert!((40..=60).contains(&ev.pitch), "bass pitch {}", ev.pitch);
    }
}

#[test]
fn test_short_song_has_single_section() {
    let song = song_request(&["C", "F"], 120.0, 8.0);
    let sections = propose_sections(8);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].name, "A");

    let composition = compose(&ComposeRequest::new(song, sections)).unwrap();
    assert_eq!(composition.total_bars, 4);
}

#[test]
fn test_arrange_keeps_melody_pitches() {
    // Dynamics and fills only touch velocities and add drum hits.
    let song = song_request(&["Am", "G", "C", "F"], 120.0, 40.0);
    let sections = propose_sections(40);
    let plain = expand_song(&song).unwrap();
    let arranged = compose(&ComposeRequest {
        voice_leading: None,
        motif: None,
        ..ComposeRequest::new(song, sections)
    })
    .unwrap();

    let pitches = |events: &[chordloom_spec::NoteEvent]| -> Vec<i32> {
        events.iter().map(|e| e.pitch).collect()
    };
    assert_eq!(
        pitches(arranged.parts.get(MELODY).unwrap()),
        pitches(plain.parts.get(MELODY).unwrap())
    );
    assert!(arranged.parts.get(DRUMS).unwrap().len() > plain.parts.get(DRUMS).unwrap().len());
}

#[test]
fn test_midi_file_layout() {
    let song = song_request(&["Dm", "G", "C"], 96.0, 20.0);
    let composition = compose(&ComposeRequest::new(song, propose_sections(20))).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.parts.mid");
    write_parts_to_file(&composition.parts, composition_tempo(96.0), &MidiTrackOptions::default(), &path)
        .unwrap();

    let info = validate_midi(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(info.tracks, 4);
    assert_eq!(info.ticks_per_quarter, 480);
    assert_eq!(&info.track_names[1..], &["bass", "drums", "melody"]);
    assert_eq!(info.note_ons[0], 0);
    for (i, (_, events)) in composition.parts.iter().enumerate() {
        assert_eq!(info.note_ons[i + 1], events.len());
    }
}

#[test]
fn test_wav_outputs() {
    let song = song_request(&["Am", "F"], 120.0, 4.0);
    let composition = compose(&ComposeRequest::new(song, propose_sections(4))).unwrap();
    let mix = mix_parts(&composition.parts, composition_tempo(120.0), &render_options(8000)).unwrap();

    let bus = wav::encode_stereo(&mix.bus, 8000).unwrap();
    let info = validate_wav(&bus.wav_data).unwrap();
    assert_eq!(info.channels, 2);
    assert_eq!(info.sample_rate, 8000);
    assert_eq!(info.num_frames as usize, mix.bus.len());

    for (name, stem) in &mix.stems {
        let encoded = wav::encode_mono(stem, 8000).unwrap();
        let info = validate_wav(&encoded.wav_data).unwrap();
        assert_eq!(info.channels, 1, "{}", name);
        assert_eq!(info.num_frames as usize, stem.len(), "{}", name);
        assert!(stem.len() <= mix.bus.len());
    }
    assert!(mix.stats.duration_sec >= 4.0);
}

#[test]
fn test_midi_without_drums_has_no_percussion_track() {
    let mut song = song_request(&["C"], 120.0, 2.0);
    song.drums = false;
    let composition = compose(&ComposeRequest::new(song, propose_sections(2))).unwrap();
    let bytes = write_parts(&composition.parts, composition_tempo(120.0), &MidiTrackOptions::default()).unwrap();
    let info = validate_midi(&bytes).unwrap();
    assert_eq!(info.tracks, 3);
    assert!(!info.track_names.iter().any(|n| n == DRUMS));
}

fn composition_tempo(bpm: f64) -> chordloom_spec::Tempo {
    chordloom_spec::Tempo::new(bpm).unwrap()
}
