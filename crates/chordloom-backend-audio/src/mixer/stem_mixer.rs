//! Renders every part and mixes the stems onto a stereo bus.

use std::collections::BTreeMap;

use chordloom_spec::{PartSet, RenderOptions, Tempo};
use tracing::debug;

use super::processing::{normalize_stereo_peak, pan_gains, PEAK_TARGET};
use super::types::{MixResult, MixStats, StemStats, StereoOutput};
use crate::error::AudioResult;
use crate::rng::part_rng;
use crate::synth::{render_part, validate_sample_rate};

/// Renders each part to a mono stem and builds the stereo mixdown.
///
/// Per-part settings come from [`RenderOptions::for_part`]. Stems are
/// zero-padded to the longest one, panned, summed and peak-limited to
/// [`PEAK_TARGET`]. Noise parts draw from a stream seeded by the part name, so
/// adding or removing one part never changes another part's stem.
pub fn mix_parts(parts: &PartSet, tempo: Tempo, opts: &RenderOptions) -> AudioResult<MixResult> {
    validate_sample_rate(opts.sample_rate)?;

    let mut stems = BTreeMap::new();
    for (name, events) in parts.iter() {
        let settings = opts.for_part(name);
        let mut rng = part_rng(opts.noise_seed, name);
        let stem = render_part(
            events,
            tempo,
            opts.sample_rate,
            settings,
            &opts.envelope,
            &mut rng,
        )?;
        stems.insert(name.to_string(), stem);
    }

    let max_len = stems.values().map(Vec::len).max().unwrap_or(0);
    let mut bus = StereoOutput::silent(max_len);
    for (name, stem) in &stems {
        let (l, r) = pan_gains(opts.for_part(name).pan);
        for (i, &s) in stem.iter().enumerate() {
            bus.left[i] += s * l;
            bus.right[i] += s * r;
        }
    }
    normalize_stereo_peak(&mut bus, PEAK_TARGET);

    let duration_sec = if max_len == 0 {
        0.0
    } else {
        (max_len as f64 / f64::from(opts.sample_rate) * 1000.0).round_ties_even() / 1000.0
    };
    let stats = MixStats {
        sample_rate: opts.sample_rate,
        duration_sec,
        stems: stems
            .iter()
            .map(|(name, s)| (name.clone(), StemStats { length: s.len() }))
            .collect(),
    };

    debug!(
        stems = stems.len(),
        samples = max_len,
        duration_sec,
        "mixed stems"
    );

    Ok(MixResult { stems, bus, stats })
}
