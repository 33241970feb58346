//! Music theory model: chord parsing, scale and chord pitch classes, and
//! register-constrained pitch search.
//!
//! This module is the leaf of the backend; nothing here depends on the
//! generators or transforms built on top of it.

use serde::Serialize;

use chordloom_spec::pitch::split_pitch_class;
use chordloom_spec::{pitch_class, ChordQuality, ChordSymbol, Key, Mode, SpecError, SpecResult};

/// An inclusive pitch range for one voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Register {
    /// Lowest allowed pitch.
    pub lo: i32,
    /// Highest allowed pitch.
    pub hi: i32,
}

impl Register {
    /// Creates a register; bounds are reordered if given backwards.
    pub const fn new(lo: i32, hi: i32) -> Self {
        if lo <= hi {
            Self { lo, hi }
        } else {
            Self { lo: hi, hi: lo }
        }
    }

    /// Integer midpoint, rounded down.
    pub fn center(&self) -> i32 {
        (self.lo + self.hi).div_euclid(2)
    }

    /// Returns true if `pitch` lies inside the register.
    pub fn contains(&self, pitch: i32) -> bool {
        (self.lo..=self.hi).contains(&pitch)
    }

    /// Clamps `pitch` into the register.
    pub fn clamp(&self, pitch: i32) -> i32 {
        pitch.clamp(self.lo, self.hi)
    }
}

/// Default melody register for generation (C4..E5).
pub const MELODY_REGISTER: Register = Register::new(60, 76);

/// Default bass register for generation (E2..G3).
pub const BASS_REGISTER: Register = Register::new(40, 55);

/// Parses a chord symbol into root and triad quality.
///
/// The root is a note letter with optional accidental. The rest of the symbol
/// is matched by substring, in order: `dim` or `o` gives diminished, `aug` or
/// `+` gives augmented, an `m` that is not part of `maj` gives minor, and
/// anything else is major. Extensions such as `7` are ignored.
///
/// # Examples
/// ```
/// use chordloom_backend_music::theory::parse_chord;
/// use chordloom_spec::ChordQuality;
///
/// let chord = parse_chord("Am7").unwrap();
/// assert_eq!((chord.root, chord.quality), (9, ChordQuality::Minor));
/// ```
pub fn parse_chord(symbol: &str) -> SpecResult<ChordSymbol> {
    let trimmed = symbol.trim();
    let (root, consumed) =
        split_pitch_class(trimmed).ok_or_else(|| SpecError::InvalidChordSymbol {
            symbol: symbol.to_string(),
        })?;

    let tail = trimmed[consumed..].to_lowercase();
    let quality = if tail.contains("dim") || tail.contains('o') {
        ChordQuality::Diminished
    } else if tail.contains("aug") || tail.contains('+') {
        ChordQuality::Augmented
    } else if tail.contains('m') && !tail.contains("maj") {
        ChordQuality::Minor
    } else {
        ChordQuality::Major
    };

    Ok(ChordSymbol::new(root, quality))
}

/// Parses a whole progression; an empty progression is rejected.
pub fn parse_anchor<S: AsRef<str>>(symbols: &[S]) -> SpecResult<Vec<ChordSymbol>> {
    if symbols.is_empty() {
        return Err(SpecError::EmptyAnchor);
    }
    symbols.iter().map(|s| parse_chord(s.as_ref())).collect()
}

/// Pitch classes of the key's scale in the given mode, in degree order.
pub fn scale_pitch_classes(key: Key, mode: Mode) -> [u8; 7] {
    mode.intervals().map(|iv| (key.root + iv) % 12)
}

/// Outcome of a register-constrained pitch search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchSearch {
    /// A pitch with an allowed class was found.
    Found(i32),
    /// No pitch in the register has an allowed class; carries the target
    /// clamped into the register.
    Exhausted {
        /// Constraint-violating fallback pitch.
        fallback: i32,
    },
}

impl PitchSearch {
    /// The chosen pitch, whether found or fallen back to.
    pub fn pitch(self) -> i32 {
        match self {
            PitchSearch::Found(p) => p,
            PitchSearch::Exhausted { fallback } => fallback,
        }
    }
}

/// Finds the pitch in `register` whose class is in `allowed` and which is
/// closest to `target`. Ties go to the lower pitch.
pub fn nearest_pitch_in_class(target: i32, allowed: &[u8], register: Register) -> PitchSearch {
    let mut best: Option<(i32, i32)> = None;
    for p in register.lo..=register.hi {
        if !allowed.contains(&pitch_class(p)) {
            continue;
        }
        let d = (p - target).abs();
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((p, d));
        }
    }
    match best {
        Some((p, _)) => PitchSearch::Found(p),
        None => PitchSearch::Exhausted {
            fallback: register.clamp(target),
        },
    }
}

/// Counters for observable degradations during a stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Pitch searches that found no allowed class in range and fell back to clamping.
    pub range_exhaustions: usize,
}

impl Diagnostics {
    /// Takes the pitch from a search result, recording and logging exhaustion.
    pub fn resolve(&mut self, search: PitchSearch, voice: &str, beat: f64) -> i32 {
        if let PitchSearch::Exhausted { fallback } = search {
            self.range_exhaustions += 1;
            tracing::warn!(
                voice,
                beat,
                fallback,
                "no pitch in register matches the pitch-class constraint; clamping"
            );
        }
        search.pitch()
    }

    /// Adds another stage's counters to these.
    pub fn merge(&mut self, other: Diagnostics) {
        self.range_exhaustions += other.range_exhaustions;
    }

    /// Returns true if nothing degraded.
    pub fn is_clean(&self) -> bool {
        self.range_exhaustions == 0
    }
}
