//! Groove extraction from a reference performance.

use chordloom_spec::{GridResolution, GrooveTemplate, Tempo};

use super::beat_grid::{BeatGrid, FABRICATED_BEATS};

/// Note onsets and beat grid of a reference performance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferencePerformance {
    /// Note-on times in seconds, in any order.
    pub onsets_sec: Vec<f64>,
    /// Beat onset times.
    pub beats: BeatGrid,
    /// Tempo to fabricate a grid from when `beats` is unusable.
    pub tempo_estimate: Option<Tempo>,
}

impl ReferencePerformance {
    /// The beat grid, or a uniform one at the estimated tempo (120 BPM if
    /// unknown) when fewer than two beats were found.
    pub fn effective_grid(&self) -> BeatGrid {
        if self.beats.is_usable() {
            return self.beats.clone();
        }
        let tempo = self.tempo_estimate.unwrap_or_default();
        tracing::debug!(
            bpm = tempo.bpm(),
            "reference has no usable beat grid; fabricating one"
        );
        BeatGrid::from_tempo(tempo, FABRICATED_BEATS)
    }
}

/// Learns per-slot timing offsets from note onsets.
///
/// Each onset is mapped to a continuous beat position, compared with its
/// nearest grid point, and the deviation in milliseconds is collected under
/// its slot within the beat. Each slot's offset is the median of its
/// deviations; slots with none stay at zero.
pub fn analyze_groove(onsets_sec: &[f64], beats: &BeatGrid, grid: GridResolution) -> GrooveTemplate {
    if onsets_sec.is_empty() {
        return GrooveTemplate::zero(grid);
    }

    let mut per_slot: Vec<Vec<f64>> = vec![Vec::new(); grid.steps()];
    for &t in onsets_sec {
        let beat = beats.time_to_beat(t);
        let nearest = grid.snap(beat);
        let spb = beats.local_seconds_per_beat(beat.trunc() as i64);
        per_slot[grid.slot(beat)].push((beat - nearest) * spb * 1000.0);
    }

    let offsets: Vec<f64> = per_slot.iter_mut().map(|v| median(v)).collect();
    tracing::debug!(
        onsets = onsets_sec.len(),
        grid = %grid,
        "extracted groove template"
    );

    GrooveTemplate::new(grid, offsets).unwrap_or_else(|_| GrooveTemplate::zero(grid))
}

/// Extracts a template from a reference performance, falling back to a
/// fabricated beat grid when the reference has none.
pub fn extract_groove_template(reference: &ReferencePerformance, grid: GridResolution) -> GrooveTemplate {
    analyze_groove(&reference.onsets_sec, &reference.effective_grid(), grid)
}

/// Median of `values`; the mean of the two middle values for even counts,
/// zero when empty.
fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}
