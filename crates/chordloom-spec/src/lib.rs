//! Chordloom Data Model
//!
//! This crate provides the value types shared by every Chordloom crate: note
//! events and part sets, pitches, chords, keys and modes, groove templates,
//! song sections, tempo, and render parameters.
//!
//! # Overview
//!
//! The pipeline works entirely in beats. A [`Tempo`] converts beats to seconds
//! only where timing becomes physical (groove extraction and synthesis).
//! Parts are threaded immutably through each stage: every transform takes a
//! [`PartSet`] by reference and returns a new one.
//!
//! # Example
//!
//! ```
//! use chordloom_spec::{NoteEvent, PartSet, Pitch, Tempo, MELODY};
//!
//! let note = NoteEvent::from_pitch(&Pitch::from("A4"), 0.0, 1.0, 96).unwrap();
//! let parts = PartSet::new().with_part(MELODY, vec![note]);
//!
//! let tempo = Tempo::new(120.0).unwrap();
//! assert_eq!(tempo.beats_to_seconds(parts.end_beat()), 0.5);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Validation errors and the [`BackendError`] trait
//! - [`pitch`]: Pitch tagged union and note-name parsing
//! - [`note`]: Note events and part sets
//! - [`harmony`]: Chord symbols, keys and diatonic modes
//! - [`groove`]: Grid resolutions and groove templates
//! - [`section`]: Song sections
//! - [`tempo`]: Tempo and beat/second conversion
//! - [`render`]: Synthesizer and mixer parameters

pub mod error;
pub mod groove;
pub mod harmony;
pub mod note;
pub mod pitch;
pub mod render;
pub mod section;
pub mod tempo;

// Re-export commonly used types at the crate root
pub use error::{BackendError, SpecError, SpecResult};
pub use groove::{GridResolution, GrooveTemplate};
pub use harmony::{ChordQuality, ChordSymbol, Key, Mode};
pub use note::{
    clamp_velocity, sort_for_export, NoteEvent, PartSet, BASS, DRUMS, MELODY, MIN_NOTE_BEATS,
};
pub use pitch::{parse_note_name, parse_pitch_class, pitch_class, Pitch};
pub use render::{
    Envelope, PartRender, PartRenderOverrides, RenderOptions, Waveform, DEFAULT_NOISE_SEED,
    DEFAULT_SAMPLE_RATE,
};
pub use section::Section;
pub use tempo::{snap_to_bar, Tempo, BEATS_PER_BAR, DEFAULT_BPM};
