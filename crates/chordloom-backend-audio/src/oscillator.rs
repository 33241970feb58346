//! Basic waveform generators.
//!
//! Periodic waveforms are evaluated from absolute time within the note
//! (`t = i / sample_rate`), so every note starts at phase zero.

use std::f64::consts::PI;

use chordloom_spec::Waveform;
use rand::Rng;
use rand_pcg::Pcg32;

/// 2π constant.
pub const TWO_PI: f64 = 2.0 * PI;

/// Concert pitch for MIDI note 69 (A4).
pub const A4_HZ: f64 = 440.0;

/// Frequency of a MIDI pitch in equal temperament.
#[inline]
pub fn midi_to_freq(pitch: i32) -> f64 {
    A4_HZ * 2.0_f64.powf(f64::from(pitch - 69) / 12.0)
}

/// Fractional part of `x`, always in `[0, 1)`.
#[inline]
fn frac(x: f64) -> f64 {
    x.rem_euclid(1.0)
}

/// Sine wave at time `t` seconds.
#[inline]
pub fn sine(freq: f64, t: f64) -> f64 {
    (TWO_PI * freq * t).sin()
}

/// Square wave: the sign of a sine, 0.0 at its zero crossings.
#[inline]
pub fn square(freq: f64, t: f64) -> f64 {
    let s = sine(freq, t);
    if s > 0.0 {
        1.0
    } else if s < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Triangle wave, starting at +1.0 and reaching -1.0 mid-period.
#[inline]
pub fn triangle(freq: f64, t: f64) -> f64 {
    2.0 * (2.0 * frac(freq * t) - 1.0).abs() - 1.0
}

/// Rising sawtooth from -1.0 to 1.0.
#[inline]
pub fn saw(freq: f64, t: f64) -> f64 {
    2.0 * frac(freq * t) - 1.0
}

/// Renders `num_samples` of a waveform at `freq`.
///
/// Noise ignores the frequency and draws uniform samples in `[-1, 1)` from
/// `rng`, advancing it by one draw per sample.
pub fn render_wave(
    wave: Waveform,
    freq: f64,
    num_samples: usize,
    sample_rate: u32,
    rng: &mut Pcg32,
) -> Vec<f64> {
    let sr = f64::from(sample_rate);
    let at = |i: usize| i as f64 / sr;
    match wave {
        Waveform::Sine => (0..num_samples).map(|i| sine(freq, at(i))).collect(),
        Waveform::Square => (0..num_samples).map(|i| square(freq, at(i))).collect(),
        Waveform::Triangle => (0..num_samples).map(|i| triangle(freq, at(i))).collect(),
        Waveform::Saw => (0..num_samples).map(|i| saw(freq, at(i))).collect(),
        Waveform::Noise => (0..num_samples)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect(),
    }
}
