use anyhow::Context;
use vr_tunnelling::backend::EffectStage;
use vr_tunnelling::{
    Cage, EffectRegistry, EffectTarget, MaskObjectId, Pose, PostProcessBackend, RenderTargetId,
    TargetId, TunnellingEffect, TunnellingSettings,
};

mod scenario;

use scenario::ScriptedRig;

const TICK_HZ: u32 = 90;
const SEED: u64 = 0x5EED;
const CAMERA: RenderTargetId = RenderTargetId(0);
// Tracking drops out for this window (seconds) to exercise the missing-target path
const DROPOUT: std::ops::Range<f32> = 11.5..12.0;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let seconds = match args.next() {
        Some(s) => s
            .parse::<f32>()
            .with_context(|| format!("invalid duration '{s}'"))?,
        None => ScriptedRig::duration_sec(),
    };
    let preset_name = args.next().unwrap_or_else(|| "default".to_string());

    let presets = scenario::presets();
    let find = |name: &str| presets.iter().find(|p| p.name == name);
    let preset = find(&preset_name).with_context(|| {
        let names: Vec<_> = presets.iter().map(|p| p.name.as_str()).collect();
        format!("unknown preset '{preset_name}' (expected one of {names:?})")
    })?;

    let mut settings = TunnellingSettings::default();
    settings.tilt.strength = 2.0;
    settings.tilt.smooth_time = 0.1;
    let mut effect = TunnellingEffect::new(settings)?;
    effect.apply_preset(preset)?;
    effect.set_motion_effect_target(Some(EffectTarget::new(TargetId(1), Pose::IDENTITY)));
    effect.set_cage(Some(Cage::new(Pose::IDENTITY)));
    effect.add_mask_object(MaskObjectId(1), &[MaskObjectId(2), MaskObjectId(3)]);

    let mut registry = EffectRegistry::new();
    registry.insert(CAMERA, effect);
    let effect = registry
        .get_mut(CAMERA)
        .context("effect missing from registry")?;

    let mut backend = PostProcessBackend::new(EffectStage::AfterEverything);
    let mut rig = ScriptedRig::new(SEED);

    let dt = 1.0 / TICK_HZ as f32;
    let frames = (seconds * TICK_HZ as f32).round() as u32;
    let switch_at = frames / 2;
    log::info!(
        "[host] {:.1}s at {} Hz, preset '{}'",
        seconds,
        TICK_HZ,
        preset.name
    );

    let mut strength_sum = 0.0f64;
    let mut strength_max = 0.0f32;
    for frame in 1..=frames {
        let t = frame as f32 * dt;
        let pose = rig.step(t, dt);
        let tracked = !DROPOUT.contains(&t);
        let out = effect.tick(dt, tracked.then_some(pose));
        effect.render(&mut backend);

        strength_sum += f64::from(out.strength);
        strength_max = strength_max.max(out.strength);

        if frame % TICK_HZ == 0 {
            let raw = effect.diagnostics().last_motion();
            let u = backend.uniforms();
            log::info!(
                "[t={:>5.1}s] strength {:.3} (raw {:.3}) av {:>6.1} deg/s speed {:.2} m/s inner {:.3} iris {}",
                t,
                out.strength,
                out.raw_strength,
                raw.angular_velocity,
                raw.velocity,
                u.aperture.fx_inner,
                u.iris.is_some()
            );
        }
        if out.counter_reset {
            log::info!("[t={:>5.1}s] counter-motion reset", t);
        }

        if frame == switch_at && preset.name != "cage" {
            if let Some(next) = find("cage") {
                effect.apply_preset(next)?;
                log::info!("[host] switched to preset '{}'", next.name);
            }
        }
    }

    let peak = effect.diagnostics().peak_motion();
    log::info!(
        "[summary] frames {} mean strength {:.3} max {:.3}; peak av {:.1} deg/s accel {:.2} m/s2 speed {:.2} m/s; mask objects {} (submitted {}x)",
        frames,
        if frames > 0 { strength_sum / f64::from(frames) } else { 0.0 },
        strength_max,
        peak.angular_velocity,
        peak.acceleration,
        peak.velocity,
        backend.mask().len(),
        backend.mask_submissions()
    );
    Ok(())
}
