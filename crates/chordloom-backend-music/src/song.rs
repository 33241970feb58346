//! Song expansion: tiles a short anchor to a target length and generates
//! every part over the tiled progression.

use chordloom_spec::{
    ChordSymbol, Key, Mode, NoteEvent, PartSet, SpecError, Tempo, BEATS_PER_BAR, DRUMS,
};

use crate::drums::generate_drums;
use crate::melody::{generate_melody_bass, GeneratorOptions};
use crate::theory::Diagnostics;
use crate::MusicResult;

/// Velocity of anchor audition notes.
pub const DEMO_VELOCITY: i32 = 100;

/// Parameters for [`expand_song`].
#[derive(Debug, Clone, PartialEq)]
pub struct SongRequest {
    /// Seed progression, one chord per bar.
    pub anchor: Vec<ChordSymbol>,
    /// Tonal center.
    pub key: Key,
    /// Diatonic mode.
    pub mode: Mode,
    /// Tempo.
    pub tempo: Tempo,
    /// Target song length in seconds.
    pub length_sec: f64,
    /// Whether to add a drums part.
    pub drums: bool,
    /// Generator registers.
    pub generator: GeneratorOptions,
}

/// A fully expanded song.
#[derive(Debug, Clone, PartialEq)]
pub struct SongPlan {
    /// Number of bars covering the requested length.
    pub total_bars: usize,
    /// Anchor repeated cyclically to `total_bars` chords.
    pub tiled_anchor: Vec<ChordSymbol>,
    /// Generated parts: `melody`, `bass` and optionally `drums`.
    pub parts: PartSet,
    /// Pitch-search fallbacks hit during generation.
    pub diagnostics: Diagnostics,
}

/// Number of 4/4 bars needed to cover `length_sec`; at least one.
pub fn bars_for_length(length_sec: f64, tempo: Tempo) -> usize {
    let bars = (length_sec / tempo.seconds_per_bar()).ceil();
    if bars.is_finite() && bars >= 1.0 {
        bars as usize
    } else {
        1
    }
}

/// Repeats `anchor` cyclically to `total_bars` chords.
pub fn tile_anchor(anchor: &[ChordSymbol], total_bars: usize) -> Vec<ChordSymbol> {
    anchor.iter().copied().cycle().take(total_bars).collect()
}

/// Expands an anchor into a complete set of parts covering the requested length.
///
/// Material is regenerated against the tiled progression rather than looped,
/// so melodic continuity runs through the whole song.
pub fn expand_song(request: &SongRequest) -> MusicResult<SongPlan> {
    if request.anchor.is_empty() {
        return Err(SpecError::EmptyAnchor.into());
    }
    if !request.length_sec.is_finite() || request.length_sec < 0.0 {
        return Err(SpecError::InvalidLength {
            seconds: request.length_sec,
        }
        .into());
    }

    let total_bars = bars_for_length(request.length_sec, request.tempo);
    let tiled_anchor = tile_anchor(&request.anchor, total_bars);

    let generated = generate_melody_bass(
        &tiled_anchor,
        request.key,
        request.mode,
        &request.generator,
    );
    let mut parts = generated.parts;
    if request.drums {
        parts.insert(DRUMS, generate_drums(total_bars));
    }

    tracing::debug!(
        total_bars,
        anchor_len = request.anchor.len(),
        events = parts.event_count(),
        drums = request.drums,
        "expanded song"
    );

    Ok(SongPlan {
        total_bars,
        tiled_anchor,
        parts,
        diagnostics: generated.diagnostics,
    })
}

/// One sustained root note per bar, for auditioning a progression.
///
/// `octave` uses scientific numbering, so octave 3 places C at 48.
pub fn anchor_demo_part(anchor: &[ChordSymbol], octave: i32) -> Vec<NoteEvent> {
    let bar = f64::from(BEATS_PER_BAR);
    anchor
        .iter()
        .enumerate()
        .map(|(i, chord)| {
            let pitch = (octave + 1) * 12 + i32::from(chord.root);
            let start = i as f64 * bar;
            NoteEvent::new(pitch, start, start + bar, DEMO_VELOCITY)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::parse_anchor;
    use chordloom_spec::{BASS, MELODY};

    fn request(symbols: &[&str], bpm: f64, length_sec: f64, drums: bool) -> SongRequest {
        SongRequest {
            anchor: parse_anchor(symbols).unwrap(),
            key: Key::new(9),
            mode: Mode::Aeolian,
            tempo: Tempo::new(bpm).unwrap(),
            length_sec,
            drums,
            generator: GeneratorOptions::default(),
        }
    }

    #[test]
    fn test_sixty_seconds_at_120_is_thirty_bars() {
        let plan = expand_song(&request(&["Am", "G", "C", "F"], 120.0, 60.0, true)).unwrap();
        assert_eq!(plan.total_bars, 30);
        assert_eq!(plan.tiled_anchor.len(), 30);
        assert_eq!(plan.tiled_anchor[4], plan.tiled_anchor[0]);
        assert_eq!(plan.tiled_anchor[29], plan.tiled_anchor[1]);
        assert_eq!(plan.parts.get(MELODY).unwrap().len(), 120);
        assert_eq!(plan.parts.get(BASS).unwrap().len(), 60);
        assert!(plan.parts.contains(DRUMS));
    }

    #[test]
    fn test_drums_are_optional() {
        let plan = expand_song(&request(&["C"], 120.0, 8.0, false)).unwrap();
        assert!(!plan.parts.contains(DRUMS));
        assert_eq!(plan.parts.len(), 2);
    }

    #[test]
    fn test_minimum_one_bar() {
        let plan = expand_song(&request(&["C", "G"], 120.0, 0.0, false)).unwrap();
        assert_eq!(plan.total_bars, 1);
        assert_eq!(plan.tiled_anchor.len(), 1);
    }

    #[test]
    fn test_partial_bar_rounds_up() {
        let tempo = Tempo::new(120.0).unwrap();
        assert_eq!(bars_for_length(2.1, tempo), 2);
        assert_eq!(bars_for_length(4.0, tempo), 2);
    }

    #[test]
    fn test_empty_anchor_is_error() {
        let mut req = request(&["C"], 120.0, 10.0, true);
        req.anchor.clear();
        let err = expand_song(&req).unwrap_err();
        assert!(matches!(err, crate::MusicError::Spec(SpecError::EmptyAnchor)));
    }

    #[test]
    fn test_anchor_demo_part() {
        let anchor = parse_anchor(&["Am", "G", "C", "F"]).unwrap();
        let demo = anchor_demo_part(&anchor, 3);
        let pitches: Vec<i32> = demo.iter().map(|e| e.pitch).collect();
        assert_eq!(pitches, vec![57, 55, 48, 53]);
        assert_eq!((demo[1].start, demo[1].end), (4.0, 8.0));
        assert!(demo.iter().all(|e| e.velocity == 100));
    }
}
