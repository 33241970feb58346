//! Core types for stem mixing.

use std::collections::BTreeMap;

use serde::Serialize;

/// Stereo output from the mixer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoOutput {
    /// Left channel samples.
    pub left: Vec<f64>,
    /// Right channel samples.
    pub right: Vec<f64>,
}

impl StereoOutput {
    /// Creates a silent bus of `len` samples per channel.
    pub fn silent(len: usize) -> Self {
        Self {
            left: vec![0.0; len],
            right: vec![0.0; len],
        }
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Interleaved `L R L R ...` samples, as written to a stereo WAV.
    pub fn interleaved(&self) -> Vec<f64> {
        self.left
            .iter()
            .zip(&self.right)
            .flat_map(|(&l, &r)| [l, r])
            .collect()
    }
}

/// Per-stem statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StemStats {
    /// Stem length in samples.
    pub length: usize,
}

/// Summary of a mixdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixStats {
    /// Sample rate of every stem and the bus.
    pub sample_rate: u32,
    /// Bus duration in seconds, rounded to the millisecond.
    pub duration_sec: f64,
    /// Stem statistics keyed by part name.
    pub stems: BTreeMap<String, StemStats>,
}

/// Rendered stems plus the stereo mixdown.
#[derive(Debug, Clone)]
pub struct MixResult {
    /// Mono stems keyed by part name.
    pub stems: BTreeMap<String, Vec<f64>>,
    /// Panned, summed and peak-limited stereo bus.
    pub bus: StereoOutput,
    /// Summary statistics.
    pub stats: MixStats,
}
