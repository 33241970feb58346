//! Note events and named part collections.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SpecResult;
use crate::pitch::Pitch;

/// Minimum note length in beats; shorter notes are stretched to this floor.
pub const MIN_NOTE_BEATS: f64 = 1e-4;

/// Lowest valid velocity.
pub const MIN_VELOCITY: u8 = 1;

/// Highest valid velocity.
pub const MAX_VELOCITY: u8 = 127;

/// Well-known part name for the lead line.
pub const MELODY: &str = "melody";

/// Well-known part name for the bass line.
pub const BASS: &str = "bass";

/// Well-known part name for the drum kit.
pub const DRUMS: &str = "drums";

/// A single note with beat-based timing.
///
/// Treated as an immutable value: transforms build new events through the
/// `with_*`/`shifted` helpers rather than mutating fields in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Semitone number (60 = middle C).
    pub pitch: i32,
    /// Onset in beats from the start of the song.
    pub start: f64,
    /// Release in beats from the start of the song.
    pub end: f64,
    /// MIDI velocity, 1..=127.
    pub velocity: u8,
}

impl NoteEvent {
    /// Creates a note, clamping velocity and flooring the length at [`MIN_NOTE_BEATS`].
    pub fn new(pitch: i32, start: f64, end: f64, velocity: i32) -> Self {
        Self {
            pitch,
            start,
            end: end.max(start + MIN_NOTE_BEATS),
            velocity: clamp_velocity(velocity),
        }
    }

    /// Creates a note from a caller-supplied pitch (number or name).
    pub fn from_pitch(pitch: &Pitch, start: f64, end: f64, velocity: i32) -> SpecResult<Self> {
        Ok(Self::new(pitch.to_midi()?, start, end, velocity))
    }

    /// Note length in beats.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Returns the same note with a different pitch.
    pub fn with_pitch(&self, pitch: i32) -> Self {
        Self { pitch, ..*self }
    }

    /// Returns the same note with a different (clamped) velocity.
    pub fn with_velocity(&self, velocity: i32) -> Self {
        Self {
            velocity: clamp_velocity(velocity),
            ..*self
        }
    }

    /// Returns the note moved by `delta` beats, keeping its length.
    pub fn shifted(&self, delta: f64) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
            ..*self
        }
    }

    /// Returns true if the note sounds anywhere inside `[start, end)`.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.end > start && self.start < end
    }

    /// Returns the part of the note inside `[start, end)`, if any.
    pub fn clipped(&self, start: f64, end: f64) -> Option<Self> {
        let s = self.start.max(start);
        let e = self.end.min(end);
        (e > s).then_some(Self {
            start: s,
            end: e,
            ..*self
        })
    }

    /// Ordering by `(start, end, pitch)` used for deterministic export.
    pub fn export_order(&self, other: &Self) -> Ordering {
        self.start
            .total_cmp(&other.start)
            .then(self.end.total_cmp(&other.end))
            .then(self.pitch.cmp(&other.pitch))
    }
}

/// Clamps an integer velocity into 1..=127.
pub fn clamp_velocity(velocity: i32) -> u8 {
    velocity.clamp(MIN_VELOCITY as i32, MAX_VELOCITY as i32) as u8
}

/// Sorts events by `(start, end, pitch)`.
pub fn sort_for_export(events: &mut [NoteEvent]) {
    events.sort_by(NoteEvent::export_order);
}

/// A set of named parts (e.g. "melody", "bass", "drums").
///
/// Backed by a `BTreeMap` so iteration order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartSet {
    parts: BTreeMap<String, Vec<NoteEvent>>,
}

impl PartSet {
    /// Creates an empty part set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the events of a part, if present.
    pub fn get(&self, name: &str) -> Option<&[NoteEvent]> {
        self.parts.get(name).map(Vec::as_slice)
    }

    /// Returns true if the part exists.
    pub fn contains(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    /// Inserts or replaces a part.
    pub fn insert(&mut self, name: impl Into<String>, events: Vec<NoteEvent>) {
        self.parts.insert(name.into(), events);
    }

    /// Builder-style insert returning the updated set.
    pub fn with_part(mut self, name: impl Into<String>, events: Vec<NoteEvent>) -> Self {
        self.insert(name, events);
        self
    }

    /// Iterates parts in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[NoteEvent])> {
        self.parts.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Part names in iteration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns true if there are no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Total number of events across all parts.
    pub fn event_count(&self) -> usize {
        self.parts.values().map(Vec::len).sum()
    }

    /// Latest note end across all parts, in beats.
    pub fn end_beat(&self) -> f64 {
        self.parts
            .values()
            .flatten()
            .map(|e| e.end)
            .fold(0.0, f64::max)
    }

    /// Returns a new set with every part transformed by `f`.
    pub fn map_parts<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&str, &[NoteEvent]) -> Vec<NoteEvent>,
    {
        Self {
            parts: self
                .parts
                .iter()
                .map(|(name, events)| (name.clone(), f(name, events)))
                .collect(),
        }
    }
}

impl FromIterator<(String, Vec<NoteEvent>)> for PartSet {
    fn from_iter<I: IntoIterator<Item = (String, Vec<NoteEvent>)>>(iter: I) -> Self {
        Self {
            parts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_enforces_floor_and_velocity() {
        let note = NoteEvent::new(60, 1.0, 1.0, 300);
        assert!(note.duration() >= MIN_NOTE_BEATS);
        assert_eq!(note.velocity, 127);

        let quiet = NoteEvent::new(60, 0.0, 1.0, -5);
        assert_eq!(quiet.velocity, 1);
    }

    #[test]
    fn test_from_pitch_name() {
        let note = NoteEvent::from_pitch(&Pitch::from("E4"), 0.0, 1.0, 90).unwrap();
        assert_eq!(note.pitch, 64);
        assert!(NoteEvent::from_pitch(&Pitch::from("Q4"), 0.0, 1.0, 90).is_err());
    }

    #[test]
    fn test_shifted_keeps_duration_and_zero_is_identity() {
        let note = NoteEvent::new(60, 0.1, 0.3, 90);
        assert_eq!(note.shifted(0.0), note);
        let moved = note.shifted(1.0);
        assert!((moved.start - 1.1).abs() < 1e-12);
        assert!((moved.duration() - note.duration()).abs() < 1e-12);
        assert_eq!(moved.pitch, 60);
    }

    #[test]
    fn test_overlap_and_clip() {
        let note = NoteEvent::new(60, 1.0, 3.0, 90);
        assert!(note.overlaps(2.0, 4.0));
        assert!(!note.overlaps(3.0, 4.0));
        let clipped = note.clipped(2.0, 4.0).unwrap();
        assert_eq!((clipped.start, clipped.end), (2.0, 3.0));
        assert!(note.clipped(3.0, 5.0).is_none());
    }

    #[test]
    fn test_sort_for_export() {
        let mut events = vec![
            NoteEvent::new(64, 1.0, 2.0, 90),
            NoteEvent::new(62, 0.0, 1.0, 90),
            NoteEvent::new(60, 0.0, 1.0, 90),
        ];
        sort_for_export(&mut events);
        let pitches: Vec<i32> = events.iter().map(|e| e.pitch).collect();
        assert_eq!(pitches, vec![60, 62, 64]);
    }

    #[test]
    fn test_part_set_basics() {
        let parts = PartSet::new()
            .with_part(MELODY, vec![NoteEvent::new(60, 0.0, 4.0, 90)])
            .with_part(BASS, vec![NoteEvent::new(40, 0.0, 2.0, 90)]);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts.names().collect::<Vec<_>>(), vec![BASS, MELODY]);
        assert_eq!(parts.event_count(), 2);
        assert_eq!(parts.end_beat(), 4.0);
        assert!(parts.get(DRUMS).is_none());

        let doubled = parts.map_parts(|_, events| events.iter().map(|e| e.shifted(1.0)).collect());
        assert_eq!(doubled.end_beat(), 5.0);
        assert_eq!(parts.end_beat(), 4.0);
    }
}
