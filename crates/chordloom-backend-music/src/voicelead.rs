//! Voice-leading smoothing.
//!
//! The bass pass walks the bass line once, snapping strong-beat notes to the
//! nearest chord tone of the bar's chord and letting weak-beat notes drift to
//! the scale degree closest to the previous note. Every choice depends only on
//! the previous output pitch, so the pass is a fixed point: running it on its
//! own output changes nothing.

use chordloom_spec::{pitch_class, ChordSymbol, Key, Mode, NoteEvent, PartSet, BASS, MELODY};

use crate::theory::{nearest_pitch_in_class, scale_pitch_classes, Diagnostics, Register};

const BEATS_PER_BAR: f64 = 4.0;
const BEAT_EPSILON: f64 = 1e-3;

/// Options for [`improve_voice_leading`].
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceLeadingOptions {
    /// Bass register.
    pub bass: Register,
    /// Melody register.
    pub melody: Register,
    /// Beat indices within a bar treated as strong.
    pub strong_beats: Vec<u32>,
    /// Whether to nudge strong-beat melody notes onto chord tones.
    pub adjust_melody: bool,
}

impl Default for VoiceLeadingOptions {
    fn default() -> Self {
        Self {
            bass: Register::new(40, 60),
            melody: Register::new(60, 84),
            strong_beats: vec![0, 2],
            adjust_melody: false,
        }
    }
}

/// Voice-led parts.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceLeading {
    /// Parts with the bass (and optionally melody) rewritten.
    pub parts: PartSet,
    /// Pitch-search fallbacks hit during smoothing.
    pub diagnostics: Diagnostics,
}

/// Enforces chord tones on strong beats and minimizes leaps.
///
/// `anchor` supplies one chord per bar and is indexed cyclically. Parts other
/// than `bass` and `melody` pass through untouched, as does everything when the
/// anchor is empty.
pub fn improve_voice_leading(
    parts: &PartSet,
    anchor: &[ChordSymbol],
    key: Key,
    mode: Mode,
    options: &VoiceLeadingOptions,
) -> VoiceLeading {
    let mut diag = Diagnostics::default();
    if anchor.is_empty() {
        return VoiceLeading {
            parts: parts.clone(),
            diagnostics: diag,
        };
    }

    let chords: Vec<[u8; 3]> = anchor.iter().map(|c| c.triad_pitch_classes()).collect();
    let scale = scale_pitch_classes(key, mode);
    let ctx = BarContext {
        chords: &chords,
        strong_beats: &options.strong_beats,
    };

    let out = parts.map_parts(|name, events| match name {
        BASS => smooth_bass(events, &ctx, &scale, options.bass, &mut diag),
        MELODY if options.adjust_melody => nudge_melody(events, &ctx, options.melody, &mut diag),
        _ => events.to_vec(),
    });

    tracing::debug!(
        bars = anchor.len(),
        adjust_melody = options.adjust_melody,
        exhaustions = diag.range_exhaustions,
        "applied voice leading"
    );

    VoiceLeading {
        parts: out,
        diagnostics: diag,
    }
}

struct BarContext<'a> {
    chords: &'a [[u8; 3]],
    strong_beats: &'a [u32],
}

impl BarContext<'_> {
    fn chord_at(&self, start: f64) -> &[u8; 3] {
        let bar = (start / BEATS_PER_BAR).floor() as i64;
        &self.chords[bar.rem_euclid(self.chords.len() as i64) as usize]
    }

    fn is_strong(&self, start: f64) -> bool {
        let in_bar = start - (start / BEATS_PER_BAR).floor() * BEATS_PER_BAR;
        let nearest = in_bar.round();
        (in_bar - nearest).abs() <= BEAT_EPSILON
            && self.strong_beats.contains(&(nearest as u32))
    }
}

fn smooth_bass(
    events: &[NoteEvent],
    ctx: &BarContext<'_>,
    scale: &[u8; 7],
    reg: Register,
    diag: &mut Diagnostics,
) -> Vec<NoteEvent> {
    let mut prev: Option<i32> = None;
    events
        .iter()
        .map(|ev| {
            let chord = ctx.chord_at(ev.start);
            let search = match prev {
                None => nearest_pitch_in_class(reg.center(), chord, reg),
                Some(p) if ctx.is_strong(ev.start) => nearest_pitch_in_class(p, chord, reg),
                Some(p) => nearest_pitch_in_class(p, &[closest_degree(scale, p)], reg),
            };
            let pitch = diag.resolve(search, BASS, ev.start);
            prev = Some(pitch);
            ev.with_pitch(pitch)
        })
        .collect()
}

fn nudge_melody(
    events: &[NoteEvent],
    ctx: &BarContext<'_>,
    reg: Register,
    diag: &mut Diagnostics,
) -> Vec<NoteEvent> {
    let mut prev: Option<i32> = None;
    events
        .iter()
        .map(|ev| {
            let pitch = if ctx.is_strong(ev.start) {
                let target = prev.unwrap_or(ev.pitch);
                let search = nearest_pitch_in_class(target, ctx.chord_at(ev.start), reg);
                diag.resolve(search, MELODY, ev.start)
            } else {
                reg.clamp(ev.pitch)
            };
            prev = Some(pitch);
            ev.with_pitch(pitch)
        })
        .collect()
}

/// Scale pitch class circularly closest to `pitch`'s class; the first degree
/// wins ties.
fn closest_degree(scale: &[u8; 7], pitch: i32) -> u8 {
    let pc = pitch_class(pitch) as i32;
    let circular = |s: u8| {
        let d = (pc - s as i32).abs();
        d.min(12 - d)
    };
    scale
        .iter()
        .copied()
        .min_by_key(|s| circular(*s))
        .unwrap_or(pc as u8)
}
