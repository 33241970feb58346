//! ADSR amplitude envelope.
//!
//! The curve is computed per note from its length in samples: linear attack
//! from 0 to 1, linear decay from 1 to the sustain level, a held sustain, and
//! a linear release to 0 over the final samples of the note.

use chordloom_spec::Envelope;

/// `count` evenly spaced values from `from` to `to`, both ends included.
fn linspace(from: f64, to: f64, count: usize) -> impl Iterator<Item = f64> {
    let step = if count > 1 {
        (to - from) / (count - 1) as f64
    } else {
        0.0
    };
    (0..count).map(move |i| from + step * i as f64)
}

/// Builds the envelope curve for a note `n` samples long.
///
/// The attack ramp is only written when it spans more than one sample, and
/// the decay ramp only when attack plus decay fit inside the note. The
/// release always ends the note, starting from whatever level the curve has
/// reached at that point. Segments longer than the note are truncated.
pub fn adsr_curve(envelope: &Envelope, n: usize, sample_rate: u32) -> Vec<f64> {
    let sr = f64::from(sample_rate);
    let sustain = envelope.sustain.clamp(0.0, 1.0);
    let to_samples = |secs: f64| (secs.max(0.0) * sr) as usize;
    let attack = to_samples(envelope.attack);
    let decay = to_samples(envelope.decay);
    let release = to_samples(envelope.release);

    let mut env = vec![sustain; n];

    if attack > 1 {
        for (slot, v) in env.iter_mut().zip(linspace(0.0, 1.0, attack)) {
            *slot = v;
        }
    }

    if decay > 0 && attack + decay < n {
        for (slot, v) in env[attack..].iter_mut().zip(linspace(1.0, sustain, decay)) {
            *slot = v;
        }
    }

    if release > 0 && n > 0 {
        let start = n.saturating_sub(release);
        let level = env[start];
        for (slot, v) in env[start..].iter_mut().zip(linspace(level, 0.0, n - start)) {
            *slot = v;
        }
    }

    env
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(attack: f64, decay: f64, sustain: f64, release: f64) -> Envelope {
        Envelope {
            attack,
            decay,
            sustain,
            release,
        }
    }

    #[test]
    fn test_shape() {
        // 5 attack, 5 decay, 5 release samples in a 20-sample note.
        let curve = adsr_curve(&env(0.625, 0.625, 0.5, 0.625), 20, 8);
        assert_eq!(curve.len(), 20);
        assert_eq!(curve[0], 0.0);
        assert_eq!(curve[4], 1.0);
        assert_eq!(curve[5], 1.0);
        assert_eq!(curve[9], 0.5);
        assert_eq!(curve[12], 0.5);
        assert_eq!(curve[15], 0.5);
        assert_eq!(curve[19], 0.0);
    }

    #[test]
    fn test_decay_skipped_when_note_too_short() {
        let curve = adsr_curve(&env(0.375, 0.625, 0.5, 0.0), 6, 8);
        assert_eq!(curve, vec![0.0, 0.5, 1.0, 0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_attack_longer_than_note_truncated() {
        let curve = adsr_curve(&env(1.25, 0.0, 0.8, 0.0), 4, 8);
        assert_eq!(curve.len(), 4);
        assert!(curve.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_release_covers_short_note() {
        let curve = adsr_curve(&env(0.0, 0.0, 0.8, 1.25), 3, 8);
        assert_eq!(curve, vec![0.8, 0.4, 0.0]);
    }

    #[test]
    fn test_empty_note() {
        assert!(adsr_curve(&Envelope::default(), 0, 44_100).is_empty());
    }

    #[test]
    fn test_default_envelope_peaks_at_one() {
        let curve = adsr_curve(&Envelope::default(), 44_100, 44_100);
        let peak = curve.iter().cloned().fold(0.0, f64::max);
        assert!((peak - 1.0).abs() < 1e-12);
        assert!((curve[22_050] - 0.85).abs() < 1e-12);
        assert!(curve.last().unwrap().abs() < 1e-12);
    }
}
