//! Stem rendering and stereo mixdown.
//!
//! Each part is rendered to a mono stem, panned with a constant-power law,
//! summed onto a stereo bus and peak-limited.

mod processing;
mod stem_mixer;
mod types;

#[cfg(test)]
mod tests_pan;
#[cfg(test)]
mod tests_processing;
#[cfg(test)]
mod tests_stem_mixer;

// Re-export public API
pub use processing::{normalize_peak, normalize_stereo_peak, pan_gains, peak, PEAK_TARGET};
pub use stem_mixer::mix_parts;
pub use types::{MixResult, MixStats, StemStats, StereoOutput};
