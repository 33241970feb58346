//! Error types for the music backend.

use thiserror::Error;

use chordloom_spec::{BackendError, SpecError};

/// Result type for music backend operations.
pub type MusicResult<T> = Result<T, MusicError>;

/// Errors that can occur while generating, transforming or serializing parts.
#[derive(Debug, Error)]
pub enum MusicError {
    /// An input value failed validation.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// A reference MIDI file could not be parsed.
    #[error("failed to parse reference MIDI: {message}")]
    MidiParse {
        /// Parser message.
        message: String,
    },

    /// A MIDI file could not be encoded.
    #[error("failed to write MIDI: {message}")]
    MidiWrite {
        /// Encoder message.
        message: String,
    },

    /// A reference MIDI file uses SMPTE timecode instead of metrical timing.
    #[error("reference MIDI uses timecode timing, which is not supported")]
    TimecodeTiming,

    /// A part name does not fit in a MIDI channel plan.
    #[error("too many parts for MIDI export: {count} (max {max})")]
    TooManyParts {
        /// Number of parts requested.
        count: usize,
        /// Number of usable channels.
        max: usize,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MusicError {
    /// Creates a MIDI parse error.
    pub fn midi_parse(message: impl Into<String>) -> Self {
        MusicError::MidiParse {
            message: message.into(),
        }
    }

    /// Creates a MIDI write error.
    pub fn midi_write(message: impl Into<String>) -> Self {
        MusicError::MidiWrite {
            message: message.into(),
        }
    }
}

impl BackendError for MusicError {
    fn code(&self) -> &'static str {
        match self {
            MusicError::Spec(inner) => inner.code(),
            MusicError::MidiParse { .. } => "MUSIC_001",
            MusicError::MidiWrite { .. } => "MUSIC_002",
            MusicError::TimecodeTiming => "MUSIC_003",
            MusicError::TooManyParts { .. } => "MUSIC_004",
            MusicError::Io(_) => "MUSIC_005",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            MusicError::Spec(inner) => inner.category(),
            _ => "music",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(MusicError::midi_parse("bad header").code(), "MUSIC_001");
        assert_eq!(MusicError::TimecodeTiming.category(), "music");

        let wrapped = MusicError::from(SpecError::EmptyAnchor);
        assert_eq!(wrapped.code(), SpecError::EmptyAnchor.code());
        assert_eq!(wrapped.category(), "validation");
        assert_eq!(wrapped.to_string(), "anchor progression is empty");
    }
}
