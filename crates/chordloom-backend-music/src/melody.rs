//! Chord-anchored melody and bass generation.
//!
//! The melody plays quarter notes: chord tones on beats 0 and 2, diatonic
//! neighbour tones on beats 1 and 3. The bass plays a root half note followed
//! by a fifth half note in every bar.

use chordloom_spec::{ChordQuality, ChordSymbol, Key, Mode, NoteEvent, PartSet, BASS, MELODY};

use crate::theory::{
    nearest_pitch_in_class, scale_pitch_classes, Diagnostics, Register, BASS_REGISTER,
    MELODY_REGISTER,
};

/// Velocity of melody notes on strong beats.
pub const STRONG_VELOCITY: i32 = 96;
/// Velocity of melody notes on weak beats.
pub const WEAK_VELOCITY: i32 = 84;
/// Velocity of bass notes.
pub const BASS_VELOCITY: i32 = 104;

const BEATS: usize = 4;

/// Registers used by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Melody range.
    pub melody: Register,
    /// Bass range.
    pub bass: Register,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            melody: MELODY_REGISTER,
            bass: BASS_REGISTER,
        }
    }
}

/// Generated melody and bass parts.
#[derive(Debug, Clone, PartialEq)]
pub struct MelodyBass {
    /// Parts keyed `melody` and `bass`.
    pub parts: PartSet,
    /// Pitch-search fallbacks hit while generating.
    pub diagnostics: Diagnostics,
}

/// Generates melody and bass over `anchor`, one chord per bar.
///
/// An empty anchor yields empty `melody` and `bass` parts.
pub fn generate_melody_bass(
    anchor: &[ChordSymbol],
    key: Key,
    mode: Mode,
    options: &GeneratorOptions,
) -> MelodyBass {
    let scale = scale_pitch_classes(key, mode);
    let mel = options.melody;
    let bass_reg = options.bass;
    let mut diag = Diagnostics::default();

    let mut melody = Vec::with_capacity(anchor.len() * BEATS);
    let mut bass = Vec::with_capacity(anchor.len() * 2);
    let mut prev: Option<i32> = None;

    for (bar, chord) in anchor.iter().enumerate() {
        let bar_start = (bar * BEATS) as f64;
        let mut find = |target: i32, allowed: &[u8], reg: Register, voice: &str| {
            diag.resolve(nearest_pitch_in_class(target, allowed, reg), voice, bar_start)
        };

        let root = find(mel.center(), &[chord.root], mel, MELODY);
        let third_target = match chord.quality {
            ChordQuality::Minor | ChordQuality::Diminished => root + 3,
            _ => root + 4,
        };
        let third = find(third_target, &[chord.third()], mel, MELODY);
        let fifth = find(root + 7, &[chord.fifth()], mel, MELODY);

        // Contour alternates between root-third and root-fifth bars.
        let strong_targets = [root, if bar % 2 == 0 { third } else { fifth }];

        let mut bar_notes: Vec<i32> = Vec::with_capacity(BEATS);
        for beat in 0..BEATS {
            let note = if beat % 2 == 0 {
                let target = strong_targets[beat / 2];
                find(prev.unwrap_or(target), &[target.rem_euclid(12) as u8], mel, MELODY)
            } else {
                let last = bar_notes.last().copied().or(prev).unwrap_or(root);
                neighbour_tone(last, root, &scale, mel, &mut find)
            };
            bar_notes.push(note);
            prev = Some(note);
        }

        for (beat, pitch) in bar_notes.into_iter().enumerate() {
            let start = bar_start + beat as f64;
            let velocity = if beat % 2 == 0 {
                STRONG_VELOCITY
            } else {
                WEAK_VELOCITY
            };
            melody.push(NoteEvent::new(pitch, start, start + 1.0, velocity));
        }

        let bass_root = find(bass_reg.center(), &[chord.root], bass_reg, BASS);
        let bass_fifth = find(bass_root + 7, &[(chord.root + 7) % 12], bass_reg, BASS);
        bass.push(NoteEvent::new(bass_root, bar_start, bar_start + 2.0, BASS_VELOCITY));
        bass.push(NoteEvent::new(
            bass_fifth,
            bar_start + 2.0,
            bar_start + 4.0,
            BASS_VELOCITY,
        ));
    }

    tracing::debug!(
        bars = anchor.len(),
        melody = melody.len(),
        bass = bass.len(),
        "generated melody and bass"
    );

    MelodyBass {
        parts: PartSet::new()
            .with_part(MELODY, melody)
            .with_part(BASS, bass),
        diagnostics: diag,
    }
}

/// Picks a scale tone one or two steps from `last`, preferring the smallest
/// leap and then the pitch closest to the bar root.
fn neighbour_tone<F>(last: i32, root: i32, scale: &[u8; 7], reg: Register, find: &mut F) -> i32
where
    F: FnMut(i32, &[u8], Register, &str) -> i32,
{
    let last_pc = last.rem_euclid(12) as u8;
    let Some(degree) = scale.iter().position(|pc| *pc == last_pc) else {
        return find(last, scale, reg, MELODY);
    };

    let mut candidates: Vec<u8> = Vec::with_capacity(4);
    for step in [-2i32, -1, 1, 2] {
        let pc = scale[(degree as i32 + step).rem_euclid(7) as usize];
        if !candidates.contains(&pc) {
            candidates.push(pc);
        }
    }

    candidates
        .into_iter()
        .map(|pc| find(last, &[pc], reg, MELODY))
        .min_by_key(|p| ((p - last).abs(), (p - root).abs()))
        .unwrap_or(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::parse_anchor;

    fn c_major_one_bar() -> MelodyBass {
        let anchor = parse_anchor(&["C"]).unwrap();
        generate_melody_bass(&anchor, Key::new(0), Mode::Ionian, &GeneratorOptions::default())
    }

    #[test]
    fn test_one_bar_shape() {
        let out = c_major_one_bar();
        let melody = out.parts.get(MELODY).unwrap();
        let bass = out.parts.get(BASS).unwrap();
        assert_eq!(melody.len(), 4);
        assert_eq!(bass.len(), 2);

        for (i, ev) in melody.iter().enumerate() {
            assert_eq!(ev.start, i as f64);
            assert_eq!(ev.end, i as f64 + 1.0);
        }
        assert_eq!((bass[0].start, bass[0].end), (0.0, 2.0));
        assert_eq!((bass[1].start, bass[1].end), (2.0, 4.0));
        assert!(out.diagnostics.is_clean());
    }

    #[test]
    fn test_one_bar_pitches() {
        let out = c_major_one_bar();
        let pitches: Vec<i32> = out.parts.get(MELODY).unwrap().iter().map(|e| e.pitch).collect();
        // Root C5 nearest the register center 68, third E5 on beat 2, and
        // weak beats a single scale step from the note before.
        assert_eq!(pitches, vec![72, 71, 76, 74]);

        let bass: Vec<i32> = out.parts.get(BASS).unwrap().iter().map(|e| e.pitch).collect();
        assert_eq!(bass, vec![48, 55]);
    }

    #[test]
    fn test_velocities() {
        let out = c_major_one_bar();
        let vels: Vec<u8> = out.parts.get(MELODY).unwrap().iter().map(|e| e.velocity).collect();
        assert_eq!(vels, vec![96, 84, 96, 84]);
        assert!(out.parts.get(BASS).unwrap().iter().all(|e| e.velocity == 104));
    }

    #[test]
    fn test_pitches_stay_in_register() {
        let anchor = parse_anchor(&["Am", "G", "C", "F", "Bdim", "E+"]).unwrap();
        let out = generate_melody_bass(&anchor, Key::new(9), Mode::Aeolian, &GeneratorOptions::default());
        for ev in out.parts.get(MELODY).unwrap() {
            assert!(MELODY_REGISTER.contains(ev.pitch), "{}", ev.pitch);
        }
        for ev in out.parts.get(BASS).unwrap() {
            assert!(BASS_REGISTER.contains(ev.pitch), "{}", ev.pitch);
        }
    }

    #[test]
    fn test_strong_beats_are_chord_tones() {
        let anchor = parse_anchor(&["Am", "G", "C", "F"]).unwrap();
        let out = generate_melody_bass(&anchor, Key::new(9), Mode::Aeolian, &GeneratorOptions::default());
        for ev in out.parts.get(MELODY).unwrap() {
            let bar = (ev.start / 4.0) as usize;
            let beat = ev.start as usize % 4;
            if beat % 2 == 0 {
                let pcs = anchor[bar].triad_pitch_classes();
                assert!(pcs.contains(&(ev.pitch.rem_euclid(12) as u8)));
            }
        }
    }

    #[test]
    fn test_empty_anchor_yields_empty_parts() {
        let out = generate_melody_bass(&[], Key::new(0), Mode::Ionian, &GeneratorOptions::default());
        assert_eq!(out.parts.get(MELODY), Some(&[][..]));
        assert_eq!(out.parts.get(BASS), Some(&[][..]));
    }
}
