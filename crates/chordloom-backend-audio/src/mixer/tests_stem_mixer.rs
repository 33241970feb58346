//! Tests for stem rendering and mixdown.

use super::*;
use chordloom_spec::{NoteEvent, PartRenderOverrides, PartSet, RenderOptions, Tempo, Waveform};
use pretty_assertions::assert_eq;

fn tempo() -> Tempo {
    Tempo::new(120.0).unwrap()
}

fn opts() -> RenderOptions {
    RenderOptions {
        sample_rate: 8000,
        ..Default::default()
    }
}

fn demo_parts() -> PartSet {
    PartSet::new()
        .with_part(
            "melody",
            vec![
                NoteEvent::new(72, 0.0, 1.0, 96),
                NoteEvent::new(74, 1.0, 2.0, 84),
            ],
        )
        .with_part("bass", vec![NoteEvent::new(48, 0.0, 4.0, 104)])
        .with_part(
            "drums",
            vec![
                NoteEvent::new(36, 0.0, 0.25, 110),
                NoteEvent::new(38, 1.0, 1.25, 100),
            ],
        )
}

#[test]
fn test_bus_peak_bound() {
    let mut opts = opts();
    for name in ["melody", "bass", "drums"] {
        opts.per_part.insert(
            name.to_string(),
            PartRenderOverrides::full(Waveform::Square, 4.0, 0.5),
        );
    }
    let mix = mix_parts(&demo_parts(), tempo(), &opts).unwrap();
    assert!(peak(&mix.bus.left) <= PEAK_TARGET + 1e-12);
    assert!(peak(&mix.bus.right) <= PEAK_TARGET + 1e-12);
    for stem in mix.stems.values() {
        assert!(peak(stem) <= PEAK_TARGET + 1e-12);
    }
}

#[test]
fn test_stats() {
    let mix = mix_parts(&demo_parts(), tempo(), &opts()).unwrap();
    // Bass ends at beat 4 = 2 s.
    assert_eq!(mix.bus.len(), 16_001);
    assert_eq!(mix.stats.sample_rate, 8000);
    assert_eq!(mix.stats.duration_sec, 2.0);
    assert_eq!(mix.stats.stems["bass"].length, 16_001);
    assert_eq!(mix.stats.stems["melody"].length, 8_001);
    assert_eq!(mix.stats.stems["drums"].length, 5_001);
}

#[test]
fn test_single_part_follows_pan_law() {
    let parts = PartSet::new().with_part("melody", vec![NoteEvent::new(72, 0.0, 1.0, 96)]);
    let opts = opts();
    let mix = mix_parts(&parts, tempo(), &opts).unwrap();
    let stem = &mix.stems["melody"];
    let (l, r) = pan_gains(opts.for_part("melody").pan);
    for (i, &s) in stem.iter().enumerate() {
        assert!((mix.bus.left[i] - s * l).abs() < 1e-12);
        assert!((mix.bus.right[i] - s * r).abs() < 1e-12);
    }
}

#[test]
fn test_hard_left_leaves_right_silent() {
    let mut opts = opts();
    opts.per_part.insert(
        "bass".to_string(),
        PartRenderOverrides {
            pan: Some(0.0),
            ..Default::default()
        },
    );
    let parts = PartSet::new().with_part("bass", vec![NoteEvent::new(40, 0.0, 2.0, 100)]);
    let mix = mix_parts(&parts, tempo(), &opts).unwrap();
    assert!(peak(&mix.bus.left) > 0.0);
    assert_eq!(peak(&mix.bus.right), 0.0);
}

#[test]
fn test_shorter_stems_are_padded() {
    let mix = mix_parts(&demo_parts(), tempo(), &opts()).unwrap();
    assert_eq!(mix.bus.left.len(), mix.bus.right.len());
    assert!(mix.stems.values().all(|s| s.len() <= mix.bus.len()));
}

#[test]
fn test_noise_stem_independent_of_other_parts() {
    let drums_only = PartSet::new().with_part(
        "drums",
        demo_parts().get("drums").unwrap_or_default().to_vec(),
    );
    let full = mix_parts(&demo_parts(), tempo(), &opts()).unwrap();
    let solo = mix_parts(&drums_only, tempo(), &opts()).unwrap();
    assert_eq!(full.stems["drums"], solo.stems["drums"]);
}

#[test]
fn test_deterministic() {
    let a = mix_parts(&demo_parts(), tempo(), &opts()).unwrap();
    let b = mix_parts(&demo_parts(), tempo(), &opts()).unwrap();
    assert_eq!(a.bus, b.bus);
    assert_eq!(a.stats, b.stats);
}

#[test]
fn test_noise_seed_changes_drums_only() {
    let mut other = opts();
    other.noise_seed = 7;
    let a = mix_parts(&demo_parts(), tempo(), &opts()).unwrap();
    let b = mix_parts(&demo_parts(), tempo(), &other).unwrap();
    assert_ne!(a.stems["drums"], b.stems["drums"]);
    assert_eq!(a.stems["melody"], b.stems["melody"]);
}

#[test]
fn test_empty_partset() {
    let mix = mix_parts(&PartSet::new(), tempo(), &opts()).unwrap();
    assert!(mix.bus.is_empty());
    assert_eq!(mix.stats.duration_sec, 0.0);
}
