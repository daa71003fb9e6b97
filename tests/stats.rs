use kira_hemostasis::math::round_to;
use kira_hemostasis::math::stats::{argmax, relative_change, trapezoid_area};

#[test]
fn rounding() {
    assert_eq!(round_to(2.346, 2), 2.35);
    assert_eq!(round_to(13.333, 1), 13.3);
    assert_eq!(round_to(359.54, 0), 360.0);
}

#[test]
fn argmax_skips_nan() {
    assert_eq!(argmax(&[1.0, f64::NAN, 3.0, 2.0]), Some(2));
    assert_eq!(argmax(&[]), None);
    assert_eq!(argmax(&[5.0, 5.0]), Some(0));
}

#[test]
fn trapezoid_of_ramp() {
    let t = [0.0, 1.0, 2.0];
    let y = [0.0, 1.0, 2.0];
    assert!((trapezoid_area(&t, &y) - 2.0).abs() < 1e-12);
}

#[test]
fn relative_change_zero_guard() {
    assert_eq!(relative_change(0.0, 5.0), 0.0);
    assert!((relative_change(200.0, 140.0) + 0.3).abs() < 1e-12);
}
