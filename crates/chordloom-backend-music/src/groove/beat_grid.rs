//! Beat-time mapping for reference performances.

use chordloom_spec::Tempo;

/// Seconds per beat assumed when a grid has fewer than two beats.
pub const FALLBACK_SECONDS_PER_BEAT: f64 = 0.5;

/// Number of beats fabricated by [`BeatGrid::from_tempo`] when the caller
/// does not ask for a specific count.
pub const FABRICATED_BEATS: usize = 128;

const MIN_INTERVAL: f64 = 1e-9;

/// Ascending beat onset times in seconds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BeatGrid {
    times: Vec<f64>,
}

impl BeatGrid {
    /// Creates a grid from beat onset times. Times are sorted.
    pub fn new(mut times: Vec<f64>) -> Self {
        times.retain(|t| t.is_finite());
        times.sort_by(f64::total_cmp);
        Self { times }
    }

    /// A uniform grid of `beats` beats starting at zero.
    pub fn from_tempo(tempo: Tempo, beats: usize) -> Self {
        let spb = tempo.seconds_per_beat();
        Self {
            times: (0..beats).map(|i| i as f64 * spb).collect(),
        }
    }

    /// Beat onset times.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Number of beats.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if the grid has no beats.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns true if the grid can interpolate (two or more beats).
    pub fn is_usable(&self) -> bool {
        self.times.len() >= 2
    }

    /// Converts a time in seconds to a continuous beat position.
    ///
    /// Interpolates linearly between surrounding beats. Before the first beat
    /// the first interval is extrapolated; past the last beat the last
    /// interval is.
    pub fn time_to_beat(&self, t: f64) -> f64 {
        let Some(&first) = self.times.first() else {
            return 0.0;
        };
        if t <= first {
            let spb = match self.times.get(1) {
                Some(second) => second - first,
                None => FALLBACK_SECONDS_PER_BEAT,
            };
            return (t - first) / spb.max(MIN_INTERVAL);
        }
        if self.times.len() < 2 {
            return (t - first) / FALLBACK_SECONDS_PER_BEAT;
        }

        let upper = self.times.partition_point(|b| *b <= t);
        let i = upper.saturating_sub(1).min(self.times.len() - 2);
        let spb = (self.times[i + 1] - self.times[i]).max(MIN_INTERVAL);
        i as f64 + (t - self.times[i]) / spb
    }

    /// Length of the beat interval starting at `beat_index`, clamped to the grid.
    pub fn local_seconds_per_beat(&self, beat_index: i64) -> f64 {
        if self.times.len() < 2 {
            return FALLBACK_SECONDS_PER_BEAT;
        }
        let last = (self.times.len() - 2) as i64;
        let i = beat_index.clamp(0, last) as usize;
        (self.times[i + 1] - self.times[i]).max(MIN_INTERVAL)
    }
}
