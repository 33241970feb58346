//! Chordloom End-to-End Test Infrastructure
//!
//! This crate provides integration tests for the generation flows:
//!
//! - Pipeline: anchor -> parts -> MIDI and WAV files
//! - Groove: reference MIDI -> template -> shifted parts
//! - **Determinism**: byte-identical output across runs
//! - CLI: presets, overrides and JSON reports
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p chordloom-tests
//! ```
//!
//! ## Determinism Testing
//!
//! ```rust,ignore
//! use chordloom_tests::determinism::verify_determinism;
//!
//! let result = verify_determinism(|| render_song(&request), 3);
//! result.assert_deterministic();
//! ```

pub mod determinism;
pub mod fixtures;
pub mod format_validators;

// Re-export commonly used items
pub use determinism::{verify_determinism, DeterminismResult, DiffInfo};
pub use fixtures::{song_request, swung_reference, SongFixture};
pub use format_validators::{validate_midi, validate_wav, FormatError, MidiInfo, WavInfo};
