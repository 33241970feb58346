//! Groove grid resolutions and timing-offset templates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};

/// Number of grid subdivisions per beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum GridResolution {
    /// "1/4" (4 slots per beat).
    Quarter,
    /// "1/8" (8 slots per beat).
    Eighth,
    /// "1/12" (12 slots per beat, triplet feel).
    Twelfth,
    /// "1/16" (16 slots per beat).
    #[default]
    Sixteenth,
    /// "1/24" (24 slots per beat).
    TwentyFourth,
    /// "1/32" (32 slots per beat).
    ThirtySecond,
}

impl GridResolution {
    /// All supported grids.
    pub const ALL: [GridResolution; 6] = [
        GridResolution::Quarter,
        GridResolution::Eighth,
        GridResolution::Twelfth,
        GridResolution::Sixteenth,
        GridResolution::TwentyFourth,
        GridResolution::ThirtySecond,
    ];

    /// Slots per beat.
    pub const fn steps(self) -> usize {
        match self {
            GridResolution::Quarter => 4,
            GridResolution::Eighth => 8,
            GridResolution::Twelfth => 12,
            GridResolution::Sixteenth => 16,
            GridResolution::TwentyFourth => 24,
            GridResolution::ThirtySecond => 32,
        }
    }

    /// Grid for a slot count, if supported.
    pub fn from_steps(steps: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.steps() == steps)
    }

    /// Slot index of a beat position: `round(frac(beat) * R) mod R`.
    pub fn slot(self, beat: f64) -> usize {
        let steps = self.steps();
        let frac = beat.rem_euclid(1.0);
        ((frac * steps as f64).round_ties_even() as usize) % steps
    }

    /// Nearest grid point to `beat`, in beats.
    pub fn snap(self, beat: f64) -> f64 {
        let steps = self.steps() as f64;
        (beat * steps).round_ties_even() / steps
    }
}

impl fmt::Display for GridResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1/{}", self.steps())
    }
}

impl FromStr for GridResolution {
    type Err = SpecError;

    /// Accepts "1/16" or the bare slot count "16".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("1/").unwrap_or(trimmed);
        digits
            .parse::<usize>()
            .ok()
            .and_then(Self::from_steps)
            .ok_or_else(|| SpecError::UnsupportedGrid {
                grid: s.to_string(),
            })
    }
}

impl TryFrom<String> for GridResolution {
    type Error = SpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GridResolution> for String {
    fn from(value: GridResolution) -> Self {
        value.to_string()
    }
}

/// Per-slot median timing deviation learned from a reference performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrooveTemplate")]
pub struct GrooveTemplate {
    grid: GridResolution,
    offsets_ms: Vec<f64>,
}

/// Unchecked serialized form of [`GrooveTemplate`].
#[derive(Deserialize)]
struct RawGrooveTemplate {
    grid: GridResolution,
    offsets_ms: Vec<f64>,
}

impl TryFrom<RawGrooveTemplate> for GrooveTemplate {
    type Error = SpecError;

    fn try_from(raw: RawGrooveTemplate) -> Result<Self, Self::Error> {
        GrooveTemplate::new(raw.grid, raw.offsets_ms)
    }
}

impl GrooveTemplate {
    /// Creates a template, checking that there is one offset per slot.
    pub fn new(grid: GridResolution, offsets_ms: Vec<f64>) -> SpecResult<Self> {
        if offsets_ms.len() != grid.steps() {
            return Err(SpecError::InvalidTemplate {
                grid: grid.to_string(),
                expected: grid.steps(),
                found: offsets_ms.len(),
            });
        }
        Ok(Self { grid, offsets_ms })
    }

    /// A template with every offset at zero.
    pub fn zero(grid: GridResolution) -> Self {
        Self {
            grid,
            offsets_ms: vec![0.0; grid.steps()],
        }
    }

    /// Grid resolution.
    pub fn grid(&self) -> GridResolution {
        self.grid
    }

    /// Offsets in milliseconds, one per slot.
    pub fn offsets_ms(&self) -> &[f64] {
        &self.offsets_ms
    }

    /// Returns true if every offset is zero.
    pub fn is_zero(&self) -> bool {
        self.offsets_ms.iter().all(|v| *v == 0.0)
    }
}
