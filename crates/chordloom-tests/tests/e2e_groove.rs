//! Groove tests: swung reference MIDI -> template -> shifted parts.

use chordloom_backend_music::groove::extract_groove_template;
use chordloom_backend_music::midi::read_reference;
use chordloom_backend_music::pipeline::{compose, ComposeRequest, GrooveStage};
use chordloom_cli::planner::propose_sections;
use chordloom_spec::{GridResolution, DRUMS, MELODY};
use chordloom_tests::{song_request, swung_reference};

fn swing_template(swing_beats: f64) -> chordloom_spec::GrooveTemplate {
    let reference = read_reference(&swung_reference(120.0, 16, swing_beats)).unwrap();
    extract_groove_template(&reference, GridResolution::Quarter)
}

#[test]
fn test_template_learns_offbeat_delay() {
    // 0.1 beats at 120 BPM is 50 ms, heard on the off-beat slot.
    let template = swing_template(0.1);
    let offsets = template.offsets_ms();
    assert_eq!(offsets.len(), 4);
    assert!((offsets[2] - 50.0).abs() < 0.5, "off-beat offset {}", offsets[2]);
    for slot in [0, 1, 3] {
        assert!(offsets[slot].abs() < 0.5, "slot {} offset {}", slot, offsets[slot]);
    }
}

#[test]
fn test_groove_moves_only_offbeat_events() {
    let song = song_request(&["Am", "G", "C", "F"], 120.0, 24.0);
    let plain_request = ComposeRequest::new(song, propose_sections(24));
    let grooved_request = ComposeRequest {
        groove: Some(GrooveStage {
            template: swing_template(0.1),
            max_ms: 12.0,
        }),
        ..plain_request.clone()
    };

    let plain = compose(&plain_request).unwrap();
    let grooved = compose(&grooved_request).unwrap();
    assert_eq!(grooved.stages.last(), Some(&"groove"));

    // Melody notes sit on beats and stay put.
    assert_eq!(plain.parts.get(MELODY), grooved.parts.get(MELODY));

    // 12 ms at 120 BPM is 0.024 beats.
    let grid = GridResolution::Quarter;
    let before = plain.parts.get(DRUMS).unwrap();
    let after = grooved.parts.get(DRUMS).unwrap();
    assert_eq!(before.len(), after.len());
    let mut moved = 0;
    for (a, b) in before.iter().zip(after) {
        let expected = if grid.slot(a.start) == 2 { 0.024 } else { 0.0 };
        assert!((b.start - a.start - expected).abs() < 1e-9, "{:?} -> {:?}", a, b);
        assert!((b.duration() - a.duration()).abs() < 1e-9);
        assert_eq!(a.pitch, b.pitch);
        if expected > 0.0 {
            moved += 1;
        }
    }
    assert!(moved > 0);
}

#[test]
fn test_reference_at_other_tempo_maps_through_its_beats() {
    // The same swing in beats yields the same ms offset scaled by the
    // reference tempo: 0.1 beats at 100 BPM is 60 ms.
    let reference = read_reference(&swung_reference(100.0, 16, 0.1)).unwrap();
    let template = extract_groove_template(&reference, GridResolution::Quarter);
    assert!((template.offsets_ms()[2] - 60.0).abs() < 0.5);
}
