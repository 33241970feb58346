//! Harmony types: chord qualities, chord symbols, keys and diatonic modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use crate::pitch::parse_pitch_class;

/// Triad quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChordQuality {
    /// Major triad (0, 4, 7).
    #[default]
    Major,
    /// Minor triad (0, 3, 7).
    Minor,
    /// Diminished triad (0, 3, 6).
    Diminished,
    /// Augmented triad (0, 4, 8).
    Augmented,
}

impl ChordQuality {
    /// Semitone intervals of the triad above its root.
    pub const fn intervals(self) -> [u8; 3] {
        match self {
            ChordQuality::Major => [0, 4, 7],
            ChordQuality::Minor => [0, 3, 7],
            ChordQuality::Diminished => [0, 3, 6],
            ChordQuality::Augmented => [0, 4, 8],
        }
    }
}

/// A parsed chord: root pitch class plus triad quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChordSymbol {
    /// Root pitch class, 0..=11.
    pub root: u8,
    /// Triad quality.
    pub quality: ChordQuality,
}

impl ChordSymbol {
    /// Creates a chord symbol; the root is reduced modulo 12.
    pub const fn new(root: u8, quality: ChordQuality) -> Self {
        Self {
            root: root % 12,
            quality,
        }
    }

    /// Pitch classes of the triad, ordered root, third, fifth.
    pub fn triad_pitch_classes(&self) -> [u8; 3] {
        self.quality.intervals().map(|iv| (self.root + iv) % 12)
    }

    /// Pitch class of the third.
    pub fn third(&self) -> u8 {
        self.triad_pitch_classes()[1]
    }

    /// Pitch class of the fifth.
    pub fn fifth(&self) -> u8 {
        self.triad_pitch_classes()[2]
    }
}

/// One of the seven diatonic modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Major scale.
    #[default]
    Ionian,
    /// Minor with raised sixth.
    Dorian,
    /// Minor with lowered second.
    Phrygian,
    /// Major with raised fourth.
    Lydian,
    /// Major with lowered seventh.
    Mixolydian,
    /// Natural minor.
    Aeolian,
    /// Diminished-fifth mode.
    Locrian,
}

impl Mode {
    /// All modes in canonical order.
    pub const ALL: [Mode; 7] = [
        Mode::Ionian,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Aeolian,
        Mode::Locrian,
    ];

    /// Ascending semitone offsets of the seven scale degrees.
    pub const fn intervals(self) -> [u8; 7] {
        match self {
            Mode::Ionian => [0, 2, 4, 5, 7, 9, 11],
            Mode::Dorian => [0, 2, 3, 5, 7, 9, 10],
            Mode::Phrygian => [0, 1, 3, 5, 7, 8, 10],
            Mode::Lydian => [0, 2, 4, 6, 7, 9, 11],
            Mode::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
            Mode::Aeolian => [0, 2, 3, 5, 7, 8, 10],
            Mode::Locrian => [0, 1, 3, 5, 6, 8, 10],
        }
    }

    /// Lowercase canonical name.
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Ionian => "ionian",
            Mode::Dorian => "dorian",
            Mode::Phrygian => "phrygian",
            Mode::Lydian => "lydian",
            Mode::Mixolydian => "mixolydian",
            Mode::Aeolian => "aeolian",
            Mode::Locrian => "locrian",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = SpecError;

    /// Accepts the seven mode names plus `major` (ionian) and `minor` (aeolian).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "major" => return Ok(Mode::Ionian),
            "minor" => return Ok(Mode::Aeolian),
            _ => {}
        }
        Mode::ALL
            .into_iter()
            .find(|m| m.name() == lower)
            .ok_or_else(|| SpecError::UnsupportedMode {
                mode: s.to_string(),
                expected: "major, minor, ionian, dorian, phrygian, lydian, mixolydian, aeolian, locrian"
                    .to_string(),
            })
    }
}

/// Tonal center: a root pitch class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    /// Root pitch class, 0..=11.
    pub root: u8,
}

impl Key {
    /// Creates a key; the root is reduced modulo 12.
    pub const fn new(root: u8) -> Self {
        Self { root: root % 12 }
    }
}

impl FromStr for Key {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pitch_class(s)
            .map(Key::new)
            .ok_or_else(|| SpecError::UnsupportedKey { key: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triads() {
        let am = ChordSymbol::new(9, ChordQuality::Minor);
        assert_eq!(am.triad_pitch_classes(), [9, 0, 4]);
        let gdim = ChordSymbol::new(7, ChordQuality::Diminished);
        assert_eq!(gdim.triad_pitch_classes(), [7, 10, 1]);
        let caug = ChordSymbol::new(0, ChordQuality::Augmented);
        assert_eq!(caug.fifth(), 8);
    }

    #[test]
    fn test_mode_tables_are_ascending() {
        for mode in Mode::ALL {
            let iv = mode.intervals();
            assert_eq!(iv[0], 0);
            assert!(iv.windows(2).all(|w| w[0] < w[1]), "{mode} not ascending");
        }
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Dorian".parse::<Mode>().unwrap(), Mode::Dorian);
        assert_eq!("major".parse::<Mode>().unwrap(), Mode::Ionian);
        assert_eq!("minor".parse::<Mode>().unwrap(), Mode::Aeolian);
        assert!(matches!(
            "blues".parse::<Mode>(),
            Err(SpecError::UnsupportedMode { .. })
        ));
    }

    #[test]
    fn test_key_from_str() {
        assert_eq!("D".parse::<Key>().unwrap(), Key::new(2));
        assert_eq!("bb".parse::<Key>().unwrap(), Key::new(10));
        assert!("Dm".parse::<Key>().is_err());
    }
}
