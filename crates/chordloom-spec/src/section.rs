//! Song sections supplied by the planning layer.

use serde::{Deserialize, Serialize};

use crate::tempo::Tempo;

/// A named time span of the song, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section label (e.g. "Intro", "Chorus/Outro").
    pub name: String,
    /// Start time in seconds.
    #[serde(alias = "start")]
    pub start_sec: f64,
    /// End time in seconds.
    #[serde(alias = "end")]
    pub end_sec: f64,
}

impl Section {
    /// Creates a section.
    pub fn new(name: impl Into<String>, start_sec: f64, end_sec: f64) -> Self {
        Self {
            name: name.into(),
            start_sec,
            end_sec,
        }
    }

    /// Returns true if the section spans no time.
    pub fn is_degenerate(&self) -> bool {
        self.end_sec <= self.start_sec
    }

    /// Case-insensitive substring match on the section name.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }

    /// Section window converted to beats at `tempo`.
    pub fn beat_window(&self, tempo: Tempo) -> (f64, f64) {
        (
            tempo.seconds_to_beats(self.start_sec),
            tempo.seconds_to_beats(self.end_sec),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_contains_is_case_insensitive() {
        let section = Section::new("Chorus/Outro", 30.0, 45.0);
        assert!(section.name_contains("chorus"));
        assert!(section.name_contains("OUTRO"));
        assert!(!section.name_contains("verse"));
    }

    #[test]
    fn test_beat_window() {
        let tempo = Tempo::new(120.0).unwrap();
        let section = Section::new("Verse", 2.0, 4.0);
        assert_eq!(section.beat_window(tempo), (4.0, 8.0));
        assert!(!section.is_degenerate());
        assert!(Section::new("Empty", 3.0, 3.0).is_degenerate());
    }

    #[test]
    fn test_deserialize_short_field_names() {
        let section: Section =
            serde_json::from_str(r#"{"name": "Intro", "start": 0, "end": 6}"#).unwrap();
        assert_eq!(section, Section::new("Intro", 0.0, 6.0));
    }
}
