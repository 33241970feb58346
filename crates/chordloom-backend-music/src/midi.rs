//! Standard MIDI File input and output.
//!
//! - [`write_parts`] encodes a part set as an SMF format 1 file: a tempo
//!   track followed by one track per part.
//! - [`read_reference`] decodes a reference performance into note onsets and
//!   a beat grid, honouring the file's tempo map.

mod reader;
mod writer;

use std::collections::{BTreeMap, BTreeSet};

use chordloom_spec::{BASS, DRUMS, MELODY};

pub use reader::read_reference;
pub use writer::{write_parts, write_parts_to_file};

/// Ticks per quarter note in written files.
pub const TICKS_PER_QUARTER: u16 = 480;

/// Zero-based channel reserved for percussion (channel 10 in GM numbering).
pub const DRUM_CHANNEL: u8 = 9;

/// Tempo assumed by a file without tempo events, in microseconds per quarter.
pub const DEFAULT_MICROS_PER_QUARTER: u32 = 500_000;

/// Per-part instrument settings for MIDI export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiTrackOptions {
    /// GM program per part; parts without an entry use program 0.
    pub programs: BTreeMap<String, u8>,
    /// Parts written on the percussion channel.
    pub drum_parts: BTreeSet<String>,
}

impl Default for MidiTrackOptions {
    fn default() -> Self {
        Self {
            programs: BTreeMap::from([(MELODY.to_string(), 73), (BASS.to_string(), 34)]),
            drum_parts: BTreeSet::from([DRUMS.to_string()]),
        }
    }
}

impl MidiTrackOptions {
    /// Options with no programs and no drum parts.
    pub fn plain() -> Self {
        Self {
            programs: BTreeMap::new(),
            drum_parts: BTreeSet::new(),
        }
    }

    /// Returns the options with `part` set to `program`.
    pub fn with_program(mut self, part: impl Into<String>, program: u8) -> Self {
        self.programs.insert(part.into(), program.min(127));
        self
    }

    /// Program for a part.
    pub fn program(&self, part: &str) -> u8 {
        self.programs.get(part).copied().unwrap_or(0)
    }

    /// Returns true if the part goes on the percussion channel.
    pub fn is_drum(&self, part: &str) -> bool {
        self.drum_parts.contains(part)
    }
}
