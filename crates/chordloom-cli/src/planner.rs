//! Section planning for a requested song length.

use chordloom_spec::Section;

/// Songs shorter than this get a single section.
pub const MIN_SECTIONED_SECONDS: u32 = 20;

/// Section names and their cut points as fractions of the song length.
const LAYOUT: [(&str, f64); 5] = [
    ("Intro", 0.10),
    ("Verse", 0.45),
    ("Chorus", 0.70),
    ("Bridge", 0.85),
    ("Chorus/Outro", 1.0),
];

/// Proposes sections for a song of `total_sec` seconds.
///
/// Under [`MIN_SECTIONED_SECONDS`] the whole song is one section `A`.
/// Otherwise the song is cut into Intro (10%), Verse (35%), Chorus (25%),
/// Bridge (15%) and Chorus/Outro (15%), with cut points rounded to whole
/// seconds. Sections that round to zero length are dropped.
pub fn propose_sections(total_sec: u32) -> Vec<Section> {
    if total_sec < MIN_SECTIONED_SECONDS {
        return vec![Section::new("A", 0.0, f64::from(total_sec))];
    }

    let total = f64::from(total_sec);
    let mut sections = Vec::with_capacity(LAYOUT.len());
    let mut start = 0.0;
    for (name, cut) in LAYOUT {
        let end = if cut >= 1.0 {
            total
        } else {
            (total * cut).round_ties_even()
        };
        if end > start {
            sections.push(Section::new(name, start, end));
        }
        start = end;
    }
    sections
}
