//! Peak limiting and panning.

use std::f64::consts::FRAC_PI_2;

use super::types::StereoOutput;

/// Ceiling applied to stems and the bus.
pub const PEAK_TARGET: f64 = 0.99;

/// Largest absolute sample value.
pub fn peak(samples: &[f64]) -> f64 {
    samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max)
}

/// Scales `samples` so the peak equals `target`, but only when it exceeds it.
///
/// Quieter audio is left untouched.
pub fn normalize_peak(samples: &mut [f64], target: f64) {
    let current = peak(samples);
    if current > target && current > 0.0 {
        let gain = target / current;
        for sample in samples.iter_mut() {
            *sample *= gain;
        }
    }
}

/// Stereo version of [`normalize_peak`]; both channels share one gain.
pub fn normalize_stereo_peak(stereo: &mut StereoOutput, target: f64) {
    let current = peak(&stereo.left).max(peak(&stereo.right));
    if current > target && current > 0.0 {
        let gain = target / current;
        for sample in stereo.left.iter_mut().chain(stereo.right.iter_mut()) {
            *sample *= gain;
        }
    }
}

/// Constant-power pan gains `(left, right)`.
///
/// `pan` is clamped to `[0, 1]`: 0 is hard left, 0.5 center, 1 hard right.
#[inline]
pub fn pan_gains(pan: f64) -> (f64, f64) {
    let theta = pan.clamp(0.0, 1.0) * FRAC_PI_2;
    (theta.cos(), theta.sin())
}
