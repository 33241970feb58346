//! Tests for peak limiting.

use super::*;

#[test]
fn test_quiet_audio_untouched() {
    let mut samples = vec![0.5, -0.3, 0.8, -0.2];
    normalize_peak(&mut samples, PEAK_TARGET);
    assert_eq!(samples, vec![0.5, -0.3, 0.8, -0.2]);
}

#[test]
fn test_loud_audio_limited() {
    let mut samples = vec![2.0, -1.5, 3.0, -2.5];
    normalize_peak(&mut samples, PEAK_TARGET);
    assert!((peak(&samples) - PEAK_TARGET).abs() < 1e-12);
    assert!((samples[0] - 0.66).abs() < 1e-12);
}

#[test]
fn test_silent_audio() {
    let mut samples = vec![0.0; 4];
    normalize_peak(&mut samples, PEAK_TARGET);
    assert!(samples.iter().all(|&s| s == 0.0));
    assert_eq!(peak(&[]), 0.0);
}

#[test]
fn test_stereo_shares_gain() {
    let mut stereo = StereoOutput {
        left: vec![1.98, 0.5],
        right: vec![-0.99, 0.1],
    };
    normalize_stereo_peak(&mut stereo, PEAK_TARGET);
    assert!((stereo.left[0] - 0.99).abs() < 1e-12);
    assert!((stereo.left[1] - 0.25).abs() < 1e-12);
    assert!((stereo.right[0] + 0.495).abs() < 1e-12);
}

#[test]
fn test_interleaved() {
    let stereo = StereoOutput {
        left: vec![0.1, 0.2],
        right: vec![-0.1, -0.2],
    };
    assert_eq!(stereo.interleaved(), vec![0.1, -0.1, 0.2, -0.2]);
    assert_eq!(stereo.len(), 2);
}
