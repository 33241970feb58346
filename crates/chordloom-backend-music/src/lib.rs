//! Chordloom Music Backend - Deterministic Song Generation and Transformation
//!
//! This crate turns a short chord progression into a full multi-part
//! arrangement and refines it through a chain of pure transforms. Every stage
//! takes a [`PartSet`](chordloom_spec::PartSet) by reference and returns a new
//! one; nothing is mutated in place and no stage performs I/O except the
//! [`midi`] module.
//!
//! # Pipeline
//!
//! 1. [`song::expand_song`] tiles the anchor and generates melody, bass and
//!    (optionally) drums.
//! 2. [`voicelead::improve_voice_leading`] snaps the bass to chord tones.
//! 3. [`motif::apply_motif_repetition`] clones the opening hook into
//!    matching sections.
//! 4. [`arrange::arrange`] scales velocities per section and adds fills.
//! 5. [`groove::impose_groove_on_parts`] humanizes timing from a template.
//!
//! [`pipeline::compose`] runs the whole chain with per-stage toggles.
//!
//! # Example
//!
//! ```
//! use chordloom_backend_music::song::{expand_song, SongRequest};
//! use chordloom_backend_music::theory::parse_anchor;
//! use chordloom_backend_music::melody::GeneratorOptions;
//! use chordloom_spec::{Key, Mode, Tempo};
//!
//! let request = SongRequest {
//!     anchor: parse_anchor(&["Am", "G", "C", "F"]).unwrap(),
//!     key: "A".parse::<Key>().unwrap(),
//!     mode: Mode::Aeolian,
//!     tempo: Tempo::new(120.0).unwrap(),
//!     length_sec: 60.0,
//!     drums: true,
//!     generator: GeneratorOptions::default(),
//! };
//! let plan = expand_song(&request).unwrap();
//! assert_eq!(plan.total_bars, 30);
//! ```
//!
//! # Module Structure
//!
//! - [`theory`]: Chord parsing, scales and register-constrained pitch search
//! - [`melody`]: Melody and bass generation
//! - [`drums`]: Drum pattern generation
//! - [`song`]: Anchor tiling and song expansion
//! - [`groove`]: Groove extraction and imposition
//! - [`voicelead`]: Voice-leading smoothing
//! - [`motif`]: Motif repetition
//! - [`arrange`]: Section dynamics and drum fills
//! - [`pipeline`]: The full chain in its fixed order
//! - [`midi`]: SMF writer and reference reader

pub mod arrange;
pub mod drums;
pub mod error;
pub mod groove;
pub mod melody;
pub mod midi;
pub mod motif;
pub mod pipeline;
pub mod song;
pub mod theory;
pub mod voicelead;

pub use error::{MusicError, MusicResult};
pub use theory::{Diagnostics, Register};
