// Smooth-damp filter behaviour.

use glam::Vec3;
use vr_tunnelling::smoothing::{smooth_damp, smooth_damp_vec3, SmoothedSignal, SmoothedVec3};

#[test]
fn zero_smoothing_time_is_pass_through() {
    let mut slew = 3.0;
    let v = smooth_damp(5.0, 2.0, &mut slew, 0.0, f32::INFINITY, 0.016);
    assert_eq!(v, 2.0);
    assert_eq!(slew, 0.0);

    let mut s = SmoothedSignal {
        value: -7.0,
        slew: 1.5,
    };
    assert_eq!(s.update(0.25, 0.0, 0.016), 0.25);
    assert_eq!(s.slew, 0.0);
}

#[test]
fn converges_without_overshoot() {
    let mut s = SmoothedSignal::default();
    let mut prev = 0.0;
    for _ in 0..300 {
        let v = s.update(1.0, 0.15, 0.016);
        assert!(v >= prev - 1e-6, "not monotonic: {prev} -> {v}");
        assert!(v <= 1.0 + 1e-6, "overshoot: {v}");
        prev = v;
    }
    assert!((prev - 1.0).abs() < 1e-3);
}

#[test]
fn longer_smoothing_lags_more() {
    let mut fast = SmoothedSignal::default();
    let mut slow = SmoothedSignal::default();
    for _ in 0..10 {
        fast.update(1.0, 0.05, 0.016);
        slow.update(1.0, 0.5, 0.016);
    }
    assert!(fast.value > slow.value);
}

#[test]
fn vector_speed_cap_limits_first_step() {
    let mut slew = Vec3::ZERO;
    let v = smooth_damp_vec3(
        Vec3::ZERO,
        Vec3::new(100.0, 0.0, 0.0),
        &mut slew,
        0.1,
        1.0,
        0.016,
    );
    assert!(v.x > 0.0 && v.x <= 0.1 + 1e-6, "x = {}", v.x);
    assert!(v.y.abs() < 1e-6 && v.z.abs() < 1e-6);
}

#[test]
fn reset_clears_value_and_slew() {
    let mut s = SmoothedSignal::default();
    s.update(1.0, 0.2, 0.016);
    s.reset();
    assert_eq!(s, SmoothedSignal::default());

    let mut v = SmoothedVec3::default();
    v.update(Vec3::ONE, 0.2, 1000.0, 0.016);
    assert!(v.value.length() > 0.0);
    v.reset();
    assert_eq!(v, SmoothedVec3::default());
}
