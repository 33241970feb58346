//! Tempo and beat/second conversion.

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};

/// Beats per bar; the pipeline is fixed to 4/4.
pub const BEATS_PER_BAR: u32 = 4;

/// Tempo assumed when none is known.
pub const DEFAULT_BPM: f64 = 120.0;

/// Tempo in beats per minute.
///
/// All generation happens in beats; conversion to seconds only happens at
/// the synthesis and groove boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    /// Creates a tempo; `bpm` must be finite and positive.
    pub fn new(bpm: f64) -> SpecResult<Self> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(SpecError::InvalidTempo { bpm });
        }
        Ok(Self { bpm })
    }

    /// Beats per minute.
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Seconds per beat (`60 / bpm`).
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Seconds per 4/4 bar.
    pub fn seconds_per_bar(&self) -> f64 {
        self.seconds_per_beat() * BEATS_PER_BAR as f64
    }

    /// Converts beats to seconds.
    pub fn beats_to_seconds(&self, beats: f64) -> f64 {
        beats * self.seconds_per_beat()
    }

    /// Converts seconds to beats.
    pub fn seconds_to_beats(&self, seconds: f64) -> f64 {
        seconds / self.seconds_per_beat()
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self { bpm: DEFAULT_BPM }
    }
}

impl TryFrom<f64> for Tempo {
    type Error = SpecError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Tempo::new(value)
    }
}

impl From<Tempo> for f64 {
    fn from(value: Tempo) -> Self {
        value.bpm
    }
}

/// Snaps a beat position to the nearest bar line.
///
/// Exact halfway positions go to the even bar index.
pub fn snap_to_bar(beat: f64) -> f64 {
    let bar = BEATS_PER_BAR as f64;
    (beat / bar).round_ties_even() * bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let tempo = Tempo::new(120.0).unwrap();
        assert_eq!(tempo.seconds_per_beat(), 0.5);
        assert_eq!(tempo.seconds_per_bar(), 2.0);
        assert_eq!(tempo.beats_to_seconds(8.0), 4.0);
        assert_eq!(tempo.seconds_to_beats(3.0), 6.0);
    }

    #[test]
    fn test_invalid_tempo() {
        assert!(Tempo::new(0.0).is_err());
        assert!(Tempo::new(-90.0).is_err());
        assert!(Tempo::new(f64::NAN).is_err());
        assert!(serde_json::from_str::<Tempo>("0").is_err());
        assert_eq!(serde_json::from_str::<Tempo>("112").unwrap().bpm(), 112.0);
    }

    #[test]
    fn test_snap_to_bar() {
        assert_eq!(snap_to_bar(0.0), 0.0);
        assert_eq!(snap_to_bar(5.9), 4.0);
        assert_eq!(snap_to_bar(6.1), 8.0);
        assert_eq!(snap_to_bar(41.0), 40.0);
        assert_eq!(snap_to_bar(6.0), 8.0);
        assert_eq!(snap_to_bar(10.0), 8.0);
    }
}
