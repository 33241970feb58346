//! Motif repetition: clones the opening melodic hook into target sections.

use chordloom_spec::{
    snap_to_bar, sort_for_export, NoteEvent, PartSet, Section, Tempo, BEATS_PER_BAR, MELODY,
};

/// Positions closer than this to the motif's own start are not overwritten.
const SELF_OVERWRITE_BEATS: f64 = 0.5;

/// Options for [`apply_motif_repetition`].
#[derive(Debug, Clone, PartialEq)]
pub struct MotifOptions {
    /// Case-insensitive substrings; a section matches if its name contains any.
    pub targets: Vec<String>,
    /// Motif length in bars.
    pub bars: u32,
}

impl Default for MotifOptions {
    fn default() -> Self {
        Self {
            targets: vec!["chorus".to_string()],
            bars: 2,
        }
    }
}

impl MotifOptions {
    fn matches(&self, section: &Section) -> bool {
        self.targets.iter().any(|t| section.name_contains(t))
    }
}

/// Repeats the first `bars` bars of the melody at the start of every
/// matching section.
///
/// Each target start is snapped to the nearest bar. Melody notes overlapping
/// the target window are removed and replaced by the motif, shifted so it
/// begins on the snapped bar. Returns the parts unchanged when there is no
/// melody or no section matches.
pub fn apply_motif_repetition(
    parts: &PartSet,
    tempo: Tempo,
    sections: &[Section],
    options: &MotifOptions,
) -> PartSet {
    let Some(melody) = parts.get(MELODY).filter(|m| !m.is_empty()) else {
        return parts.clone();
    };

    let motif_start = melody
        .iter()
        .map(|e| e.start)
        .fold(f64::INFINITY, f64::min);
    let motif_len = f64::from(options.bars * BEATS_PER_BAR);
    let motif_end = motif_start + motif_len;
    let motif: Vec<NoteEvent> = melody
        .iter()
        .filter_map(|e| e.clipped(motif_start, motif_end))
        .collect();
    if motif.is_empty() {
        return parts.clone();
    }

    let targets: Vec<f64> = sections
        .iter()
        .filter(|s| options.matches(s))
        .map(|s| snap_to_bar(tempo.seconds_to_beats(s.start_sec)))
        .filter(|snapped| (snapped - motif_start).abs() >= SELF_OVERWRITE_BEATS)
        .collect();
    if targets.is_empty() {
        return parts.clone();
    }

    let mut new_melody = melody.to_vec();
    for &target in &targets {
        let window_end = target + motif_len;
        new_melody.retain(|e| !e.overlaps(target, window_end));
        let delta = target - motif_start;
        new_melody.extend(motif.iter().map(|e| e.shifted(delta)));
    }
    sort_for_export(&mut new_melody);

    tracing::debug!(
        targets = targets.len(),
        motif_events = motif.len(),
        "repeated motif"
    );

    parts.clone().with_part(MELODY, new_melody)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordloom_spec::BASS;
    use pretty_assertions::assert_eq;

    fn melody(bars: usize) -> Vec<NoteEvent> {
        (0..bars * 4)
            .map(|i| NoteEvent::new(60 + (i % 7) as i32, i as f64, i as f64 + 1.0, 90))
            .collect()
    }

    fn tempo() -> Tempo {
        Tempo::new(120.0).unwrap()
    }

    #[test]
    fn test_no_matching_sections_is_noop() {
        let parts = PartSet::new().with_part(MELODY, melody(8));
        let sections = vec![Section::new("Verse", 4.0, 8.0)];
        let out = apply_motif_repetition(&parts, tempo(), &sections, &MotifOptions::default());
        assert_eq!(out, parts);
    }

    #[test]
    fn test_chorus_gets_shifted_motif() {
        let parts = PartSet::new().with_part(MELODY, melody(8));
        // 8.2 s at 120 BPM is beat 16.4, snapped to bar line 16.
        let sections = vec![
            Section::new("Verse", 0.0, 8.2),
            Section::new("Chorus", 8.2, 16.0),
        ];
        let out = apply_motif_repetition(&parts, tempo(), &sections, &MotifOptions::default());
        let out_melody = out.get(MELODY).unwrap();

        let motif: Vec<NoteEvent> = melody(8).into_iter().filter(|e| e.start < 8.0).collect();
        let window: Vec<NoteEvent> = out_melody
            .iter()
            .filter(|e| e.start >= 16.0 && e.start < 24.0)
            .copied()
            .collect();
        let shifted: Vec<NoteEvent> = motif.iter().map(|e| e.shifted(16.0)).collect();
        assert_eq!(window, shifted);
        assert_eq!(out_melody.len(), 32);
    }

    #[test]
    fn test_case_insensitive_filter() {
        let parts = PartSet::new().with_part(MELODY, melody(4));
        let sections = vec![Section::new("Chorus/Outro", 4.0, 8.0)];
        let out = apply_motif_repetition(&parts, tempo(), &sections, &MotifOptions::default());
        assert_ne!(out, parts);
    }

    #[test]
    fn test_self_overwrite_guard() {
        let parts = PartSet::new().with_part(MELODY, melody(4));
        let sections = vec![Section::new("Chorus", 0.1, 8.0)];
        let out = apply_motif_repetition(&parts, tempo(), &sections, &MotifOptions::default());
        assert_eq!(out, parts);
    }

    #[test]
    fn test_overlapping_notes_removed() {
        let mut evs = melody(2);
        // A long note spanning into the target window.
        evs.push(NoteEvent::new(50, 7.0, 9.5, 80));
        let parts = PartSet::new().with_part(MELODY, evs);
        let opts = MotifOptions {
            targets: vec!["hook".to_string()],
            bars: 1,
        };
        let sections = vec![Section::new("Hook", 4.0, 6.0)];
        let out = apply_motif_repetition(&parts, tempo(), &sections, &opts);
        let out_melody = out.get(MELODY).unwrap();
        assert!(out_melody.iter().all(|e| e.pitch != 50));
        assert!(out_melody.windows(2).all(|w| w[0].start <= w[1].start));
    }

    #[test]
    fn test_missing_melody_is_noop() {
        let parts = PartSet::new().with_part(BASS, melody(2));
        let sections = vec![Section::new("Chorus", 4.0, 8.0)];
        let out = apply_motif_repetition(&parts, tempo(), &sections, &MotifOptions::default());
        assert_eq!(out, parts);
    }
}
