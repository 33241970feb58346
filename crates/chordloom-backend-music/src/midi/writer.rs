//! SMF writer.

use std::path::Path;

use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};

use chordloom_spec::{NoteEvent, PartSet, Tempo};

use super::{MidiTrackOptions, DRUM_CHANNEL, TICKS_PER_QUARTER};
use crate::{MusicError, MusicResult};

const MAX_DELTA: u32 = 0x0FFF_FFFF;

/// Encodes `parts` as a Standard MIDI File.
///
/// Beats map to ticks at [`TICKS_PER_QUARTER`], which under the written tempo
/// places every note at `beats * 60 / bpm` seconds. Drum parts go on the
/// percussion channel; other parts get their own channel in name order.
pub fn write_parts(parts: &PartSet, tempo: Tempo, options: &MidiTrackOptions) -> MusicResult<Vec<u8>> {
    let melodic = parts.names().filter(|n| !options.is_drum(n)).count();
    if melodic > 15 {
        return Err(MusicError::TooManyParts {
            count: melodic,
            max: 15,
        });
    }

    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));
    smf.tracks.push(tempo_track(tempo));

    let mut next_channel: u8 = 0;
    for (name, events) in parts.iter() {
        let channel = if options.is_drum(name) {
            DRUM_CHANNEL
        } else {
            let ch = next_channel;
            next_channel += 1;
            if next_channel == DRUM_CHANNEL {
                next_channel += 1;
            }
            ch
        };
        smf.tracks
            .push(part_track(name, events, channel, options.program(name)));
    }

    let mut buf = Vec::new();
    smf.write(&mut buf)
        .map_err(|e| MusicError::midi_write(e.to_string()))?;

    tracing::debug!(
        tracks = smf.tracks.len(),
        bytes = buf.len(),
        bpm = tempo.bpm(),
        "encoded MIDI"
    );
    Ok(buf)
}

/// Encodes `parts` and writes them to `path`.
pub fn write_parts_to_file(
    parts: &PartSet,
    tempo: Tempo,
    options: &MidiTrackOptions,
    path: &Path,
) -> MusicResult<()> {
    let bytes = write_parts(parts, tempo, options)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn tempo_track(tempo: Tempo) -> Track<'static> {
    let micros = (60_000_000.0 / tempo.bpm()).round().clamp(1.0, 16_777_215.0) as u32;
    vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(micros))),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TimeSignature(4, 2, 24, 8)),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        },
    ]
}

/// A note boundary at an absolute tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Boundary {
    tick: u32,
    // Note-offs sort before note-ons at the same tick.
    on: bool,
    key: u8,
    vel: u8,
}

fn beat_to_tick(beat: f64) -> u32 {
    (beat * f64::from(TICKS_PER_QUARTER))
        .round()
        .clamp(0.0, f64::from(u32::MAX / 2)) as u32
}

fn part_track<'a>(name: &'a str, events: &[NoteEvent], channel: u8, program: u8) -> Track<'a> {
    let channel = u4::new(channel);
    let mut track: Track<'a> = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(program.min(127)),
                },
            },
        },
    ];

    let mut boundaries: Vec<Boundary> = Vec::with_capacity(events.len() * 2);
    for ev in events {
        let key = ev.pitch.clamp(0, 127) as u8;
        let on = beat_to_tick(ev.start);
        let off = beat_to_tick(ev.end).max(on + 1);
        boundaries.push(Boundary {
            tick: on,
            on: true,
            key,
            vel: ev.velocity,
        });
        boundaries.push(Boundary {
            tick: off,
            on: false,
            key,
            vel: 0,
        });
    }
    boundaries.sort();

    let mut last_tick = 0u32;
    for b in boundaries {
        let delta = (b.tick - last_tick).min(MAX_DELTA);
        last_tick = b.tick;
        let message = if b.on {
            MidiMessage::NoteOn {
                key: u7::new(b.key),
                vel: u7::new(b.vel),
            }
        } else {
            MidiMessage::NoteOff {
                key: u7::new(b.key),
                vel: u7::new(0),
            }
        };
        track.push(TrackEvent {
            delta: u28::new(delta),
            kind: TrackEventKind::Midi { channel, message },
        });
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    track
}
