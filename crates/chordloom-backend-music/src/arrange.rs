//! Arrangement polish: per-section dynamics and drum fills at section
//! transitions.

use chordloom_spec::{
    snap_to_bar, sort_for_export, NoteEvent, PartSet, Section, Tempo, BASS, DRUMS, MELODY,
};

use crate::drums::DrumVoice;

/// Gain keywords, checked in order; the first one found in a section name wins.
const SECTION_GAINS: [(&str, f64); 4] = [
    ("intro", 0.88),
    ("chorus", 1.15),
    ("bridge", 0.96),
    ("outro", 0.92),
];

/// Velocity gain for a section name (1.0 when no keyword matches).
pub fn section_gain(name: &str) -> f64 {
    let lower = name.to_lowercase();
    SECTION_GAINS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map_or(1.0, |(_, gain)| *gain)
}

/// Gain applied to a part: melody and bass take the full section gain, every
/// other part (drums in particular) a dampened `0.5 * gain + 0.5`.
pub fn part_gain(part: &str, gain: f64) -> f64 {
    if part == MELODY || part == BASS {
        gain
    } else {
        0.5 * gain + 0.5
    }
}

/// Scales velocities section by section.
///
/// Each event is scaled once, by the first section (in list order) whose beat
/// window it overlaps. Zero-length sections are skipped.
pub fn apply_dynamics(parts: &PartSet, tempo: Tempo, sections: &[Section]) -> PartSet {
    let windows: Vec<(f64, f64, f64)> = sections
        .iter()
        .filter(|s| {
            if s.is_degenerate() {
                tracing::debug!(section = %s.name, "skipping zero-length section");
            }
            !s.is_degenerate()
        })
        .map(|s| {
            let (start, end) = s.beat_window(tempo);
            (start, end, section_gain(&s.name))
        })
        .collect();
    if windows.is_empty() {
        return parts.clone();
    }

    parts.map_parts(|name, events| {
        events
            .iter()
            .map(|ev| {
                match windows.iter().find(|(start, end, _)| ev.overlaps(*start, *end)) {
                    Some(&(_, _, gain)) => scale_velocity(ev, part_gain(name, gain)),
                    None => *ev,
                }
            })
            .collect()
    })
}

fn scale_velocity(ev: &NoteEvent, gain: f64) -> NoteEvent {
    let scaled = (f64::from(ev.velocity) * gain).round_ties_even();
    ev.with_velocity(scaled as i32)
}

/// Adds a drum fill leading into every section after the first.
///
/// The fill sits in the bar before the section's bar-snapped start: four
/// sixteenth snares from beat 3, a kick on the last offbeat, and a crash on
/// the new downbeat. Fills whose bar would start before zero are skipped, and
/// nothing happens without a drums part.
pub fn add_fills(parts: &PartSet, tempo: Tempo, sections: &[Section]) -> PartSet {
    let Some(drums) = parts.get(DRUMS) else {
        return parts.clone();
    };

    let mut out = drums.to_vec();
    let mut fills = 0usize;
    for section in sections.iter().skip(1) {
        let downbeat = snap_to_bar(tempo.seconds_to_beats(section.start_sec));
        let bar = downbeat - 4.0;
        if bar < 0.0 {
            tracing::debug!(section = %section.name, "fill would start before zero; skipping");
            continue;
        }
        for offset in [3.0, 3.25, 3.5, 3.75] {
            out.push(DrumVoice::Snare.hit(bar + offset, 0.20, 110));
        }
        out.push(DrumVoice::Kick.hit(bar + 3.5, 0.18, 115));
        out.push(DrumVoice::Crash.hit(downbeat, 1.5, 118));
        fills += 1;
    }
    sort_for_export(&mut out);

    tracing::debug!(fills, "added drum fills");
    parts.clone().with_part(DRUMS, out)
}

/// Runs [`apply_dynamics`] then [`add_fills`].
pub fn arrange(parts: &PartSet, tempo: Tempo, sections: &[Section]) -> PartSet {
    if sections.is_empty() {
        return parts.clone();
    }
    let dynamic = apply_dynamics(parts, tempo, sections);
    add_fills(&dynamic, tempo, sections)
}
