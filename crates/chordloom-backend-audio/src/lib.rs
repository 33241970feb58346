//! Chordloom Audio Backend
//!
//! Renders part sets to audio with a small additive oscillator synthesizer
//! and mixes the resulting stems onto a stereo bus.
//!
//! # Determinism
//!
//! Rendering is deterministic. Noise is the only random source and it draws
//! from PCG32 streams whose seeds are derived per part via BLAKE3, so the same
//! parts and [`RenderOptions`](chordloom_spec::RenderOptions) always produce
//! byte-identical WAV files.
//!
//! # Example
//!
//! ```
//! use chordloom_backend_audio::{mix_parts, wav};
//! use chordloom_spec::{NoteEvent, PartSet, RenderOptions, Tempo};
//!
//! let parts = PartSet::new().with_part("melody", vec![NoteEvent::new(72, 0.0, 1.0, 96)]);
//! let tempo = Tempo::new(120.0).unwrap();
//! let mix = mix_parts(&parts, tempo, &RenderOptions::default()).unwrap();
//!
//! let wav = wav::encode_stereo(&mix.bus, mix.stats.sample_rate).unwrap();
//! assert_eq!(wav.channels, 2);
//! ```
//!
//! # Crate Structure
//!
//! - [`envelope`] - ADSR envelope curve
//! - [`mixer`] - Stem rendering, panning and mixdown
//! - [`oscillator`] - Basic waveform generators
//! - [`rng`] - Deterministic RNG with seed derivation
//! - [`synth`] - Per-part note rendering
//! - [`wav`] - 16-bit PCM WAV output

pub mod envelope;
pub mod error;
pub mod mixer;
pub mod oscillator;
pub mod rng;
pub mod synth;
pub mod wav;

// Re-export main types at crate root
pub use error::{AudioError, AudioResult};
pub use mixer::{mix_parts, MixResult, MixStats, StereoOutput};
pub use synth::render_part;
pub use wav::WavResult;
