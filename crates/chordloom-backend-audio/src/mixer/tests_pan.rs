//! Tests for the constant-power pan law.

use super::*;

#[test]
fn test_pan_extremes() {
    assert_eq!(pan_gains(0.0), (1.0, 0.0));
    let (l, r) = pan_gains(1.0);
    assert!(l.abs() < 1e-12);
    assert!((r - 1.0).abs() < 1e-12);
}

#[test]
fn test_pan_center_is_equal_power() {
    let (l, r) = pan_gains(0.5);
    assert!((l - r).abs() < 1e-12);
    assert!((l - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
}

#[test]
fn test_pan_power_is_constant() {
    for i in 0..=20 {
        let (l, r) = pan_gains(i as f64 / 20.0);
        assert!((l * l + r * r - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_pan_is_clamped() {
    assert_eq!(pan_gains(-0.5), pan_gains(0.0));
    assert_eq!(pan_gains(3.0), pan_gains(1.0));
}
