//! Error types for input validation.

use thiserror::Error;

/// Result type for validation of model values.
pub type SpecResult<T> = Result<T, SpecError>;

/// Errors raised when a plain input value cannot be turned into a model value.
///
/// These are the validation failures of the pipeline: they are always raised
/// distinctly and never replaced by a silent default.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    /// Chord symbol without a recognizable root.
    #[error("invalid chord symbol '{symbol}'")]
    InvalidChordSymbol {
        /// The offending symbol.
        symbol: String,
    },

    /// Pitch name that cannot be normalized to a semitone number.
    #[error("invalid pitch name '{name}'")]
    InvalidPitchName {
        /// The offending name.
        name: String,
    },

    /// Pitch number outside the MIDI range.
    #[error("pitch {pitch} is outside 0..=127")]
    PitchOutOfRange {
        /// The offending pitch.
        pitch: i32,
    },

    /// Mode name not among the seven diatonic modes or their aliases.
    #[error("unsupported mode '{mode}' (expected one of: {expected})")]
    UnsupportedMode {
        /// The offending mode.
        mode: String,
        /// Comma-separated list of accepted names.
        expected: String,
    },

    /// Key name that is not a single pitch class.
    #[error("unsupported key '{key}'")]
    UnsupportedKey {
        /// The offending key.
        key: String,
    },

    /// Anchor progression with no chords.
    #[error("anchor progression is empty")]
    EmptyAnchor,

    /// Groove grid that is not one of the supported subdivisions.
    #[error("unsupported grid '{grid}' (expected one of 1/4, 1/8, 1/12, 1/16, 1/24, 1/32)")]
    UnsupportedGrid {
        /// The offending grid.
        grid: String,
    },

    /// Tempo that is not a finite positive number.
    #[error("invalid tempo: {bpm} bpm")]
    InvalidTempo {
        /// The offending tempo.
        bpm: f64,
    },

    /// Groove template whose offsets do not match its grid.
    #[error("groove template has {found} offsets but grid {grid} needs {expected}")]
    InvalidTemplate {
        /// Grid label.
        grid: String,
        /// Expected number of offsets.
        expected: usize,
        /// Actual number of offsets.
        found: usize,
    },

    /// Song length that is not a finite positive number.
    #[error("invalid song length: {seconds} seconds")]
    InvalidLength {
        /// The offending length.
        seconds: f64,
    },
}

impl BackendError for SpecError {
    fn code(&self) -> &'static str {
        match self {
            SpecError::InvalidChordSymbol { .. } => "SPEC_001",
            SpecError::InvalidPitchName { .. } => "SPEC_002",
            SpecError::PitchOutOfRange { .. } => "SPEC_003",
            SpecError::UnsupportedMode { .. } => "SPEC_004",
            SpecError::UnsupportedKey { .. } => "SPEC_005",
            SpecError::EmptyAnchor => "SPEC_006",
            SpecError::UnsupportedGrid { .. } => "SPEC_007",
            SpecError::InvalidTempo { .. } => "SPEC_008",
            SpecError::InvalidTemplate { .. } => "SPEC_009",
            SpecError::InvalidLength { .. } => "SPEC_010",
        }
    }

    fn category(&self) -> &'static str {
        "validation"
    }
}

/// Trait for backend-specific errors with stable codes.
///
/// Every crate in the workspace implements this for its error type so that
/// reporting layers can print and group failures uniformly.
pub trait BackendError: std::error::Error {
    /// Get the error code for reporting.
    ///
    /// Returns a static string like "MUSIC_001" or "AUDIO_002". These codes
    /// are stable and can be used for programmatic error handling.
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category for grouping related errors.
    fn category(&self) -> &'static str;
}
