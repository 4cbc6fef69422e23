//! Smoothed motion channels folded into a single vignette strength.

use crate::motion::MotionSample;
use crate::settings::{MotionConfig, TunnellingSettings};
use crate::smoothing::SmoothedSignal;

/// Clamp to `[0, 1]`; NaN becomes 0.
#[inline]
pub fn clamp01(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

#[inline]
fn finite_or_zero(x: f32) -> f32 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// Relative float equality used for the `min == max` guard.
#[inline]
pub fn approximately(a: f32, b: f32) -> bool {
    (b - a).abs() < (1e-6 * a.abs().max(b.abs())).max(f32::MIN_POSITIVE * 8.0)
}

/// `clamp01((value - min) / (max - min))`, or 0 when the range is empty.
pub fn normalize(value: f32, min: f32, max: f32) -> f32 {
    if approximately(max, min) {
        return 0.0;
    }
    clamp01((value - min) / (max - min))
}

/// `lerp(floor, 1, x)` with `x` clamped to `[0, 1]`.
#[inline]
pub fn remap_coverage(x: f32, floor: f32) -> f32 {
    floor + (1.0 - floor) * clamp01(x)
}

/// Final composite: `clamp01(remap(x) * remap(coverage))`.
#[inline]
pub fn composite(x: f32, coverage: f32, floor: f32) -> f32 {
    clamp01(remap_coverage(x, floor) * remap_coverage(coverage, floor))
}

/// Per-channel normalized level in `[0, 1]`, before strength weighting.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChannelValues {
    pub angular_velocity: f32,
    pub velocity: f32,
    pub acceleration: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectState {
    /// Weighted channel sum before the coverage remap.
    pub raw_strength: f32,
    /// Always within `[0, 1]`; the only value rendering consumes.
    pub final_strength: f32,
    pub levels: ChannelValues,
}

/// Owns the smoothing state of the three channels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrengthCalculator {
    angular_velocity: SmoothedSignal,
    velocity: SmoothedSignal,
    acceleration: SmoothedSignal,
}

impl StrengthCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.angular_velocity.reset();
        self.velocity.reset();
        self.acceleration.reset();
    }

    pub fn angular_velocity_signal(&self) -> SmoothedSignal {
        self.angular_velocity
    }

    pub fn velocity_signal(&self) -> SmoothedSignal {
        self.velocity
    }

    pub fn acceleration_signal(&self) -> SmoothedSignal {
        self.acceleration
    }

    /// Advance enabled channels with this tick's sample and composite the result.
    ///
    /// Disabled channels neither contribute nor advance their smoothing state.
    pub fn update(
        &mut self,
        settings: &TunnellingSettings,
        sample: &MotionSample,
        analyze_all: bool,
    ) -> EffectState {
        let pick = |cfg: &MotionConfig| {
            if analyze_all && !cfg.enabled {
                cfg.forced(0.0)
            } else {
                *cfg
            }
        };
        let av = pick(&settings.angular_velocity);
        let vel = pick(&settings.velocity);
        let acc = pick(&settings.acceleration);
        let dt = sample.dt;

        let mut levels = ChannelValues::default();
        if av.enabled {
            let target = normalize(finite_or_zero(sample.angular_velocity), av.min, av.max);
            let smoothed = self.angular_velocity.update(target, av.smoothing_time, dt);
            levels.angular_velocity = channel_level(smoothed, &av);
        }
        if vel.enabled {
            let smoothed = self
                .velocity
                .update(finite_or_zero(sample.speed), vel.smoothing_time, dt);
            levels.velocity = normalize(smoothed, vel.min, vel.max);
        }
        if acc.enabled {
            let target = normalize(finite_or_zero(sample.acceleration), acc.min, acc.max);
            let smoothed = self.acceleration.update(target, acc.smoothing_time, dt);
            levels.acceleration = channel_level(smoothed, &acc);
        }

        let mut raw = 0.0;
        raw += weighted(levels.angular_velocity, &av);
        raw += weighted(levels.velocity, &vel);
        raw += weighted(levels.acceleration, &acc);

        let effect = &settings.effect;
        EffectState {
            raw_strength: raw,
            final_strength: composite(raw, effect.coverage, effect.coverage_floor),
            levels,
        }
    }
}

// Smoothed level of a pre-normalized channel; an empty range still yields 0
// even if the smoother holds residue from an earlier configuration.
fn channel_level(smoothed: f32, cfg: &MotionConfig) -> f32 {
    if approximately(cfg.max, cfg.min) {
        0.0
    } else {
        clamp01(smoothed)
    }
}

fn weighted(level: f32, cfg: &MotionConfig) -> f32 {
    if cfg.enabled {
        finite_or_zero(level * cfg.strength)
    } else {
        0.0
    }
}
