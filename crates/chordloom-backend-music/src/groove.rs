//! Groove extraction and imposition.
//!
//! A groove template holds the median timing deviation of a reference
//! performance for each grid slot within a beat. Imposing it shifts quantized
//! notes by the same deviations to humanize them.

mod analyze;
mod beat_grid;
mod impose;

pub use analyze::{analyze_groove, extract_groove_template, ReferencePerformance};
pub use beat_grid::{BeatGrid, FABRICATED_BEATS, FALLBACK_SECONDS_PER_BEAT};
pub use impose::{impose_groove, impose_groove_on_parts, DEFAULT_MAX_MS};
