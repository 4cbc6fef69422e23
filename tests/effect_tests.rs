// End-to-end ticking of a single effect.

use glam::{Quat, Vec3};
use std::f32::consts::PI;
use vr_tunnelling::{
    Cage, CounterVelocityMode, EffectRegistry, EffectTarget, MotionConfig, Pose, RenderTargetId,
    TargetId, TunnellingEffect, TunnellingSettings,
};

const DT: f32 = 0.016;
// remap(0) * remap(0.75) with a 0.65 floor
const STATIONARY: f32 = 0.65 * 0.9125;
// remap(1) * remap(0.75)
const SATURATED: f32 = 0.9125;

fn all_channels() -> TunnellingSettings {
    let mut s = TunnellingSettings::default();
    s.acceleration = MotionConfig {
        enabled: true,
        max: 10.0,
        ..MotionConfig::acceleration()
    };
    s.velocity = MotionConfig {
        enabled: true,
        max: 5.0,
        ..MotionConfig::velocity()
    };
    s
}

fn yaw(rad: f32) -> Pose {
    Pose::new(Vec3::ZERO, Quat::from_rotation_y(rad))
}

#[test]
fn stationary_target_sits_at_the_floor() {
    let mut effect = TunnellingEffect::new(all_channels()).unwrap();
    let mut out = effect.tick(DT, Some(Pose::IDENTITY));
    for _ in 0..9 {
        out = effect.tick(DT, Some(Pose::IDENTITY));
    }
    assert!((out.strength - STATIONARY).abs() < 1e-6);
    assert_eq!(out.raw_strength, 0.0);
}

#[test]
fn fast_rotation_saturates_the_channel() {
    let mut effect = TunnellingEffect::default();
    let mut out = effect.tick(DT, Some(yaw(0.0)));
    for i in 1..200 {
        out = effect.tick(DT, Some(yaw(PI * i as f32)));
    }
    assert!(out.levels.angular_velocity > 0.999);
    assert!((out.strength - SATURATED).abs() < 1e-3);
    assert!(effect.diagnostics().last_motion().angular_velocity > 10_000.0);
}

#[test]
fn divided_effect_target_steps_every_fourth_tick() {
    let mut settings = TunnellingSettings::default();
    settings.framerate.division = 4;
    let mut effect = TunnellingEffect::new(settings).unwrap();
    assert!(effect
        .set_motion_effect_target(Some(EffectTarget::new(TargetId(7), Pose::IDENTITY)))
        .is_none());

    for tick in 1..=8u32 {
        let live = Pose::new(
            Vec3::new(tick as f32, 0.0, 0.0),
            Quat::from_rotation_y(0.1 * tick as f32),
        );
        let out = effect.tick(DT, Some(live));
        let target = out.effect_target.expect("effect target is attached");
        if tick % 4 == 0 {
            assert_eq!(target, live, "tick {tick}");
        } else {
            assert_ne!(target, live, "tick {tick}");
        }
    }
}

#[test]
fn reset_motion_is_idempotent() {
    let mut effect = TunnellingEffect::default();
    effect.tick(DT, Some(yaw(0.0)));
    effect.tick(DT, Some(yaw(1.0)));
    effect.reset_motion();
    let once = effect.strength_calculator().clone();
    let counter = *effect.counter_motion();
    effect.reset_motion();
    assert_eq!(*effect.strength_calculator(), once);
    assert_eq!(*effect.counter_motion(), counter);

    // first tick after a reset sees no motion
    let out = effect.tick(DT, Some(yaw(2.5)));
    assert_eq!(out.levels.angular_velocity, 0.0);
}

#[test]
fn strength_stays_in_unit_range_for_wild_input() {
    let mut settings = all_channels();
    settings.angular_velocity.strength = 2.0;
    settings.velocity.strength = 2.0;
    let mut effect = TunnellingEffect::new(settings).unwrap();

    let poses = [
        Pose::new(Vec3::splat(1e30), Quat::from_rotation_x(3.0)),
        Pose::new(Vec3::new(f32::NAN, 0.0, 0.0), Quat::IDENTITY),
        Pose::new(Vec3::ZERO, Quat::from_xyzw(f32::NAN, 0.0, 0.0, 1.0)),
        Pose::new(Vec3::splat(-1e30), Quat::from_rotation_z(-2.0)),
        Pose::IDENTITY,
    ];
    for (i, pose) in poses.iter().cycle().take(40).enumerate() {
        let dt = if i % 7 == 0 { 0.0 } else { DT };
        let out = effect.tick(dt, Some(*pose));
        assert!(
            (0.0..=1.0).contains(&out.strength),
            "tick {i}: {}",
            out.strength
        );
    }
}

#[test]
fn missing_target_decays_and_recovers_without_a_jump() {
    let mut effect = TunnellingEffect::default();
    effect.tick(DT, Some(Pose::IDENTITY));
    effect.tick(DT, Some(yaw(1.0)));

    for _ in 0..100 {
        let out = effect.tick(DT, None);
        assert!((0.0..=1.0).contains(&out.strength));
    }
    assert!(effect.diagnostics().missing_target());
    let decayed = effect.last_output().strength;
    assert!((decayed - STATIONARY).abs() < 1e-3);

    let far = Pose::new(Vec3::new(100.0, 0.0, 100.0), Quat::from_rotation_y(2.0));
    let out = effect.tick(DT, Some(far));
    assert!(!effect.diagnostics().missing_target());
    assert_eq!(effect.diagnostics().last_motion().velocity, 0.0);
    assert!(out.levels.angular_velocity < 1e-3);
}

#[test]
fn forced_strength_is_still_coverage_remapped() {
    let mut effect = TunnellingEffect::default();
    effect.diagnostics_mut().force_on = true;
    effect.diagnostics_mut().force_value = 1.0;
    let out = effect.tick(DT, Some(Pose::IDENTITY));
    assert!((out.strength - SATURATED).abs() < 1e-6);
    assert_eq!(out.raw_strength, 0.0);
}

#[test]
fn analyze_all_runs_disabled_channels_without_weight() {
    let mut effect = TunnellingEffect::default();
    effect.diagnostics_mut().analyze_all_channels = true;
    let mut settings = *effect.settings();
    settings.velocity.max = 1.0;
    effect.set_settings(settings).unwrap();

    effect.tick(DT, Some(Pose::IDENTITY));
    let mut out = effect.tick(DT, Some(Pose::new(Vec3::Z * 0.1, Quat::IDENTITY)));
    for i in 2..60 {
        out = effect.tick(DT, Some(Pose::new(Vec3::Z * 0.1 * i as f32, Quat::IDENTITY)));
    }
    assert!(out.levels.velocity > 0.9);
    assert!(out.raw_strength.abs() < 1e-6);
}

#[test]
fn disabled_effect_outputs_zero() {
    let mut effect = TunnellingEffect::default();
    effect.set_enabled(false);
    let out = effect.tick(DT, Some(yaw(1.0)));
    assert_eq!(out.strength, 0.0);

    effect.set_enabled(true);
    let out = effect.tick(DT, Some(yaw(2.0)));
    assert!((out.strength - STATIONARY).abs() < 1e-6);
}

#[test]
fn registry_keeps_one_effect_per_target() {
    let mut registry = EffectRegistry::new();
    let cam = RenderTargetId(3);
    assert!(registry.insert(cam, TunnellingEffect::default()).is_none());

    let mut second = TunnellingEffect::default();
    second.set_enabled(false);
    assert!(registry.insert(cam, second).is_some());
    assert_eq!(registry.len(), 1);
    assert!(!registry.get(cam).unwrap().is_enabled());

    for (_, effect) in registry.iter_mut() {
        effect.set_enabled(true);
    }
    assert!(registry.get_mut(cam).unwrap().is_enabled());
    assert!(registry.remove(cam).is_some());
    assert!(registry.is_empty());
}

#[test]
fn swapping_effect_target_restores_the_old_one() {
    let mut settings = TunnellingSettings::default();
    settings.tilt.enabled = true;
    settings.tilt.strength = 5.0;
    let mut effect = TunnellingEffect::new(settings).unwrap();

    let initial = Quat::from_rotation_y(0.4);
    effect.set_motion_effect_target(Some(EffectTarget::new(
        TargetId(1),
        Pose::new(Vec3::ZERO, initial),
    )));
    effect.tick(DT, Some(Pose::IDENTITY));
    effect.tick(DT, Some(Pose::new(Vec3::Z * 0.5, Quat::IDENTITY)));
    let tilted = effect.effect_target().unwrap().local.rotation;
    assert!(tilted.dot(initial).abs() < 1.0 - 1e-6);

    let old = effect
        .set_motion_effect_target(Some(EffectTarget::new(TargetId(2), Pose::IDENTITY)))
        .unwrap();
    assert_eq!(old.id, TargetId(1));
    assert!(old.local.rotation.dot(initial).abs() > 1.0 - 1e-5);
}

#[test]
fn counter_translation_resets_at_distance() {
    let mut settings = TunnellingSettings::default();
    settings.counter_motion.enabled = true;
    settings.counter_motion.velocity_mode = CounterVelocityMode::Real;
    settings.counter_motion.reset_distance = 5.0;
    let mut effect = TunnellingEffect::new(settings).unwrap();
    effect.set_cage(Some(Cage::new(Pose::IDENTITY)));

    for i in 0..6 {
        let pose = Pose::new(Vec3::Z * i as f32, Quat::IDENTITY);
        let out = effect.tick(DT, Some(pose));
        if i == 5 {
            assert!(out.counter_reset);
            assert_eq!(effect.counter_motion().translation, Vec3::ZERO);
            assert_eq!(out.cage, Some(Pose::IDENTITY));
            assert!((effect.counter_motion().last_reset_trigger_distance - 5.0).abs() < 1e-4);
        } else {
            assert!(!out.counter_reset, "tick {i}");
            let cage = out.cage.unwrap();
            assert!((cage.position.z - i as f32).abs() < 1e-4);
        }
    }
}

#[test]
fn missing_target_warns_at_once_then_every_five_seconds() {
    let mut effect = TunnellingEffect::default();
    effect.tick(DT, Some(Pose::IDENTITY));
    assert_eq!(effect.diagnostics().missing_target_warnings(), 0);

    effect.tick(0.5, None);
    assert_eq!(effect.diagnostics().missing_target_warnings(), 1);
    for _ in 0..9 {
        effect.tick(0.5, None);
    }
    assert_eq!(effect.diagnostics().missing_target_warnings(), 1);
    effect.tick(0.5, None);
    assert_eq!(effect.diagnostics().missing_target_warnings(), 2);
    for _ in 0..10 {
        effect.tick(0.5, None);
    }
    assert_eq!(effect.diagnostics().missing_target_warnings(), 3);

    // losing it again after a re-acquire warns straight away
    effect.tick(DT, Some(Pose::IDENTITY));
    effect.tick(DT, None);
    assert_eq!(effect.diagnostics().missing_target_warnings(), 4);
}
