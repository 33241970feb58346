//! Parsing of user-facing control values: keys, modes, anchors, durations
//! and markers.

use std::sync::OnceLock;

use chordloom_spec::{Key, Mode, SpecError};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Key spellings accepted on the command line.
pub const KEYS: [&str; 17] = [
    "C", "C#", "Db", "D", "D#", "Eb", "E", "F", "F#", "Gb", "G", "G#", "Ab", "A", "A#", "Bb", "B",
];

const MINUTES_PATTERN: &str = r"^(\d+)m(?:(\d+)s)?$";
const CLOCK_PATTERN: &str = r"^(\d+):([0-5]\d)$";
const CLOCK_MARKER_PATTERN: &str = r"^(\d+:[0-5]\d):(.*)$";
const ANCHOR_SEPARATOR_PATTERN: &str = r"[,\-\s]+";

static MINUTES_REGEX: OnceLock<Regex> = OnceLock::new();
static CLOCK_REGEX: OnceLock<Regex> = OnceLock::new();
static CLOCK_MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
static ANCHOR_SEPARATOR_REGEX: OnceLock<Regex> = OnceLock::new();

fn minutes_regex() -> &'static Regex {
    MINUTES_REGEX.get_or_init(|| Regex::new(MINUTES_PATTERN).expect("invalid regex pattern"))
}

fn clock_regex() -> &'static Regex {
    CLOCK_REGEX.get_or_init(|| Regex::new(CLOCK_PATTERN).expect("invalid regex pattern"))
}

fn clock_marker_regex() -> &'static Regex {
    CLOCK_MARKER_REGEX
        .get_or_init(|| Regex::new(CLOCK_MARKER_PATTERN).expect("invalid regex pattern"))
}

fn anchor_separator_regex() -> &'static Regex {
    ANCHOR_SEPARATOR_REGEX
        .get_or_init(|| Regex::new(ANCHOR_SEPARATOR_PATTERN).expect("invalid regex pattern"))
}

/// Errors from parsing control values.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Key not in [`KEYS`].
    #[error("unsupported key '{input}' (try one of: {})", KEYS.join(", "))]
    Key {
        /// The offending input.
        input: String,
    },

    /// Unrecognized duration syntax.
    #[error("length '{input}' must look like 60, 60s, 1m30s, 1:00 or 00:45")]
    Duration {
        /// The offending input.
        input: String,
    },

    /// Malformed marker.
    #[error("marker '{input}' {reason}")]
    Marker {
        /// The offending input.
        input: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Invalid model value.
    #[error(transparent)]
    Spec(#[from] SpecError),
}

/// Canonicalizes a key name.
///
/// Accepts any letter case and unicode accidentals; returns the canonical
/// spelling (e.g. "bb" becomes "Bb") and its pitch class.
pub fn canonical_key(input: &str) -> Result<(String, Key), ControlError> {
    let upper = input
        .trim()
        .replace('♯', "#")
        .replace('♭', "b")
        .to_uppercase();
    let canonical = match upper.as_str() {
        "DB" | "EB" | "GB" | "AB" | "BB" => format!("{}b", &upper[..1]),
        _ => upper,
    };
    let name = KEYS
        .iter()
        .find(|k| **k == canonical)
        .ok_or_else(|| ControlError::Key {
            input: input.to_string(),
        })?;
    let key = name.parse::<Key>()?;
    Ok((name.to_string(), key))
}

/// Parses a mode name, accepting `major` and `minor` as aliases.
pub fn canonical_mode(input: &str) -> Result<Mode, ControlError> {
    Ok(input.parse::<Mode>()?)
}

/// Splits an anchor string on commas, dashes or whitespace.
///
/// `"Am-G-C-F"`, `"Am G C F"` and `"Am, G, C, F"` all give the same four
/// symbols. An empty string gives no symbols.
pub fn split_anchor(input: &str) -> Vec<String> {
    anchor_separator_regex()
        .split(input.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a duration in whole seconds.
///
/// Accepts `60`, `60s`, `1m`, `1m30s`, `1:00` and `00:45`.
pub fn parse_duration(input: &str) -> Result<u32, ControlError> {
    let s = input.trim().to_lowercase();
    let bad = || ControlError::Duration {
        input: input.to_string(),
    };
    let number = |text: &str| text.parse::<u32>().map_err(|_| bad());

    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return number(&s);
    }
    if let Some(secs) = s.strip_suffix('s') {
        if !secs.is_empty() && secs.bytes().all(|b| b.is_ascii_digit()) {
            return number(secs);
        }
    }
    if let Some(caps) = minutes_regex().captures(&s) {
        let mins = number(&caps[1])?;
        let secs = caps.get(2).map(|m| number(m.as_str())).transpose()?.unwrap_or(0);
        return mins
            .checked_mul(60)
            .and_then(|m| m.checked_add(secs))
            .ok_or_else(bad);
    }
    if let Some(caps) = clock_regex().captures(&s) {
        let mins = number(&caps[1])?;
        let secs = number(&caps[2])?;
        return mins
            .checked_mul(60)
            .and_then(|m| m.checked_add(secs))
            .ok_or_else(bad);
    }
    Err(bad())
}

/// A labelled point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
    /// Time in seconds.
    pub time_sec: u32,
    /// Free-form label.
    pub label: String,
}

/// Parses one `time:label` marker.
///
/// The time may be `30`, `30s`, `1m30s` or `mm:ss`; for `mm:ss` the label
/// follows the second colon (`00:45:filter_sweep`).
pub fn parse_marker(input: &str) -> Result<Marker, ControlError> {
    let marker_error = |reason| ControlError::Marker {
        input: input.to_string(),
        reason,
    };

    let (time, label) = match clock_marker_regex().captures(input.trim()) {
        Some(caps) => (
            caps[1].to_string(),
            caps.get(2).map_or("", |m| m.as_str()).to_string(),
        ),
        None => {
            let (time, label) = input
                .split_once(':')
                .ok_or_else(|| marker_error("must be 'time:label' (e.g. 30:motif or 00:45:motif)"))?;
            (time.to_string(), label.to_string())
        }
    };

    let time = time.trim().to_lowercase();
    let plain = time.bytes().all(|b| b.is_ascii_digit());
    if time.is_empty() || !(plain || time.ends_with('s') || clock_regex().is_match(&time)) {
        return Err(marker_error("has a bad time format"));
    }
    let time_sec = parse_duration(&time).map_err(|_| marker_error("has a bad time format"))?;

    Ok(Marker {
        time_sec,
        label: label.trim().to_string(),
    })
}

/// Parses repeated markers and sorts them by time.
pub fn parse_markers<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<Marker>, ControlError> {
    let mut markers = inputs
        .iter()
        .map(|m| parse_marker(m.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    markers.sort_by_key(|m| m.time_sec);
    Ok(markers)
}

/// Formats whole seconds as `mm:ss`.
pub fn format_mss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
