//! Groove imposition: shifts note onsets by a template's per-slot offsets.

use chordloom_spec::{GrooveTemplate, NoteEvent, PartSet, Tempo};

/// Default humanization limit in milliseconds.
pub const DEFAULT_MAX_MS: f64 = 12.0;

/// Shifts every event by its slot's offset, clamped to `±|max_ms|`.
///
/// The slot comes from the event's position within its beat. Start and end
/// move together, so durations and pitches are unchanged. Events are never
/// moved before time zero. An all-zero template returns the events unchanged.
pub fn impose_groove(
    events: &[NoteEvent],
    tempo: Tempo,
    template: &GrooveTemplate,
    max_ms: f64,
) -> Vec<NoteEvent> {
    let limit = max_ms.abs();
    let grid = template.grid();
    let offsets: Vec<f64> = template
        .offsets_ms()
        .iter()
        .map(|v| v.clamp(-limit, limit))
        .collect();
    let spb = tempo.seconds_per_beat();

    events
        .iter()
        .map(|ev| {
            let shift = (offsets[grid.slot(ev.start)] / 1000.0) / spb;
            ev.shifted(shift.max(-ev.start))
        })
        .collect()
}

/// Applies [`impose_groove`] to every part.
pub fn impose_groove_on_parts(
    parts: &PartSet,
    tempo: Tempo,
    template: &GrooveTemplate,
    max_ms: f64,
) -> PartSet {
    tracing::debug!(grid = %template.grid(), max_ms, "imposing groove");
    parts.map_parts(|_, events| impose_groove(events, tempo, template, max_ms))
}
