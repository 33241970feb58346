//! Reference-performance reader.

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use chordloom_spec::Tempo;

use super::DEFAULT_MICROS_PER_QUARTER;
use crate::groove::{BeatGrid, ReferencePerformance};
use crate::{MusicError, MusicResult};

/// Tempo change at an absolute tick.
#[derive(Debug, Clone, Copy)]
struct TempoChange {
    tick: u64,
    micros_per_quarter: u32,
}

/// Piecewise tick-to-seconds conversion built from a file's tempo events.
#[derive(Debug)]
struct TempoMap {
    ppq: f64,
    // Sorted by tick; the first entry is always at tick 0.
    changes: Vec<TempoChange>,
}

impl TempoMap {
    fn new(ppq: u16, mut changes: Vec<TempoChange>) -> Self {
        changes.sort_by_key(|c| c.tick);
        if changes.first().map_or(true, |c| c.tick > 0) {
            changes.insert(
                0,
                TempoChange {
                    tick: 0,
                    micros_per_quarter: DEFAULT_MICROS_PER_QUARTER,
                },
            );
        }
        Self {
            ppq: f64::from(ppq.max(1)),
            changes,
        }
    }

    fn seconds(&self, tick: u64) -> f64 {
        let mut elapsed = 0.0;
        for (i, change) in self.changes.iter().enumerate() {
            let segment_end = self
                .changes
                .get(i + 1)
                .map_or(tick, |next| next.tick.min(tick));
            if segment_end <= change.tick {
                break;
            }
            let ticks = (segment_end - change.tick) as f64;
            elapsed += ticks / self.ppq * f64::from(change.micros_per_quarter) / 1e6;
        }
        elapsed
    }

    fn initial_bpm(&self) -> f64 {
        let micros = self.changes.first().map_or(DEFAULT_MICROS_PER_QUARTER, |c| c.micros_per_quarter);
        60_000_000.0 / f64::from(micros.max(1))
    }
}

/// Decodes a reference performance from Standard MIDI File bytes.
///
/// Every note-on with non-zero velocity, on any track, contributes an onset.
/// Beats fall on every quarter note from tick zero through the end of the
/// last note, converted to seconds through the tempo map.
pub fn read_reference(bytes: &[u8]) -> MusicResult<ReferencePerformance> {
    let smf = Smf::parse(bytes).map_err(|e| MusicError::midi_parse(e.to_string()))?;
    let ppq = match smf.header.timing {
        Timing::Metrical(ppq) => ppq.as_int(),
        Timing::Timecode(..) => return Err(MusicError::TimecodeTiming),
    };

    let mut tempo_changes = Vec::new();
    let mut onset_ticks = Vec::new();
    let mut last_tick = 0u64;

    for track in &smf.tracks {
        let mut tick = 0u64;
        for event in track {
            tick += u64::from(event.delta.as_int());
            match event.kind {
                TrackEventKind::Meta(MetaMessage::Tempo(micros)) => {
                    tempo_changes.push(TempoChange {
                        tick,
                        micros_per_quarter: micros.as_int(),
                    });
                }
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { vel, .. },
                    ..
                } if vel.as_int() > 0 => {
                    onset_ticks.push(tick);
                    last_tick = last_tick.max(tick);
                }
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOff { .. } | MidiMessage::NoteOn { .. },
                    ..
                } => {
                    last_tick = last_tick.max(tick);
                }
                _ => {}
            }
        }
    }

    let map = TempoMap::new(ppq, tempo_changes);
    let onsets_sec: Vec<f64> = onset_ticks.iter().map(|t| map.seconds(*t)).collect();

    let quarter = u64::from(ppq.max(1));
    let beat_count = last_tick / quarter + 1;
    let beats = BeatGrid::new((0..=beat_count).map(|b| map.seconds(b * quarter)).collect());

    tracing::debug!(
        onsets = onsets_sec.len(),
        beats = beats.len(),
        ppq,
        "read reference MIDI"
    );

    Ok(ReferencePerformance {
        onsets_sec,
        beats,
        tempo_estimate: Tempo::new(map.initial_bpm()).ok(),
    })
}
