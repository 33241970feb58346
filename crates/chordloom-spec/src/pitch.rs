//! Pitch representation and note-name parsing.
//!
//! Pitches enter the system either as semitone numbers or as note names.
//! Both forms are normalized to an integer semitone (60 = middle C = "C4")
//! at the ingestion boundary; everything downstream works on integers.

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};

/// Highest valid MIDI pitch.
pub const MAX_PITCH: i32 = 127;

/// Semitone offsets for natural note letters (C=0, D=2, E=4, F=5, G=7, A=9, B=11).
const LETTER_SEMITONES: [(char, i32); 7] = [
    ('C', 0),
    ('D', 2),
    ('E', 4),
    ('F', 5),
    ('G', 7),
    ('A', 9),
    ('B', 11),
];

/// A pitch as supplied by a caller: a semitone number or a note name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pitch {
    /// Semitone number (60 = middle C).
    Midi(i32),
    /// Note name such as "C4", "F#3" or "Bb5".
    Name(String),
}

impl Pitch {
    /// Normalizes the pitch to a semitone number in 0..=127.
    pub fn to_midi(&self) -> SpecResult<i32> {
        let midi = match self {
            Pitch::Midi(n) => *n,
            Pitch::Name(name) => parse_note_name(name)?,
        };
        if !(0..=MAX_PITCH).contains(&midi) {
            return Err(SpecError::PitchOutOfRange { pitch: midi });
        }
        Ok(midi)
    }
}

impl From<i32> for Pitch {
    fn from(value: i32) -> Self {
        Pitch::Midi(value)
    }
}

impl From<&str> for Pitch {
    fn from(value: &str) -> Self {
        Pitch::Name(value.to_string())
    }
}

/// Splits a leading note letter and optional accidental off `text`.
///
/// Returns the pitch class (0..=11) and the number of bytes consumed, or
/// `None` when `text` does not start with a note letter. Accepts `#`, `b`,
/// `♯` and `♭` as accidentals.
pub fn split_pitch_class(text: &str) -> Option<(u8, usize)> {
    let mut chars = text.char_indices();
    let (_, letter) = chars.next()?;
    let base = LETTER_SEMITONES
        .iter()
        .find(|(c, _)| *c == letter.to_ascii_uppercase())
        .map(|(_, s)| *s)?;

    let mut consumed = letter.len_utf8();
    let mut accidental = 0;
    if let Some((idx, c)) = chars.next() {
        match c {
            '#' | '♯' => {
                accidental = 1;
                consumed = idx + c.len_utf8();
            }
            'b' | '♭' => {
                accidental = -1;
                consumed = idx + c.len_utf8();
            }
            _ => {}
        }
    }

    Some(((base + accidental).rem_euclid(12) as u8, consumed))
}

/// Parses a bare pitch-class name (e.g. "C", "F#", "Bb", "D♭") into 0..=11.
///
/// Enharmonic spellings unify: `parse_pitch_class("C#") == parse_pitch_class("Db")`.
pub fn parse_pitch_class(name: &str) -> Option<u8> {
    let trimmed = name.trim();
    let (pc, consumed) = split_pitch_class(trimmed)?;
    (consumed == trimmed.len()).then_some(pc)
}

/// Parses a note name with octave (e.g. "C4", "A#3", "Bb-1") into a semitone number.
///
/// Uses scientific octave numbering, so "C4" is 60 and "A4" is 69.
///
/// # Examples
/// ```
/// use chordloom_spec::pitch::parse_note_name;
///
/// assert_eq!(parse_note_name("C4").unwrap(), 60);
/// assert_eq!(parse_note_name("A4").unwrap(), 69);
/// assert_eq!(parse_note_name("Bb3").unwrap(), 58);
/// ```
pub fn parse_note_name(name: &str) -> SpecResult<i32> {
    let trimmed = name.trim();
    let invalid = || SpecError::InvalidPitchName {
        name: name.to_string(),
    };

    let (pc, consumed) = split_pitch_class(trimmed).ok_or_else(invalid)?;
    let octave: i32 = trimmed[consumed..].parse().map_err(|_| invalid())?;

    // Accidentals can cross the octave boundary ("B#3" is C4, "Cb4" is B3).
    let letter_pc = split_pitch_class(&trimmed[..1]).map(|(p, _)| p).ok_or_else(invalid)?;
    let carry = match (letter_pc, pc) {
        (11, 0) => 1,
        (0, 11) => -1,
        _ => 0,
    };

    Ok((octave + 1 + carry) * 12 + pc as i32)
}

/// Pitch class of a semitone number.
pub fn pitch_class(pitch: i32) -> u8 {
    pitch.rem_euclid(12) as u8
}
