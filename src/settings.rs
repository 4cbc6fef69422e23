//! Runtime parameter set consumed by every per-frame component.
//!
//! Defaults reproduce the stock comfort profile: angular velocity only,
//! 0–180 °/s, 0.15 s smoothing, 75% maximum coverage.

use crate::backend::{MaskMode, StencilSettings};
use crate::constants::*;
use crate::error::ConfigError;
use glam::{Vec2, Vec3, Vec4};

/// One motion channel. `min`/`max` are in the channel's own unit
/// (deg/s, m/s² or m/s) and `min == max` disables the channel's contribution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
    pub enabled: bool,
    pub strength: f32,
    pub min: f32,
    pub max: f32,
    pub smoothing_time: f32,
}

impl MotionConfig {
    pub fn angular_velocity() -> Self {
        Self {
            enabled: true,
            strength: 1.0,
            min: 0.0,
            max: DEFAULT_ANGULAR_VELOCITY_MAX,
            smoothing_time: DEFAULT_SMOOTHING_SEC,
        }
    }

    pub fn acceleration() -> Self {
        Self {
            enabled: false,
            strength: 1.0,
            min: 0.0,
            max: 0.0,
            smoothing_time: DEFAULT_SMOOTHING_SEC,
        }
    }

    pub fn velocity() -> Self {
        Self::acceleration()
    }

    /// Same as `self` with `enabled` forced on and `strength` set.
    pub fn forced(&self, strength: f32) -> Self {
        Self {
            enabled: true,
            strength,
            ..*self
        }
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        check_range(name, self.strength, 0.0, MOTION_STRENGTH_MAX)?;
        check_finite(name, self.min)?;
        check_finite(name, self.max)?;
        check_range(name, self.smoothing_time, 0.0, f32::MAX)
    }
}

/// What the vignetted periphery shows. Passed through to the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BackgroundMode {
    #[default]
    Color,
    Skybox,
    CageColor,
    CageSkybox,
    CageOnly,
    Blur,
}

impl BackgroundMode {
    pub fn uses_cage(self) -> bool {
        matches!(
            self,
            BackgroundMode::CageColor | BackgroundMode::CageSkybox | BackgroundMode::CageOnly
        )
    }
}

/// Visual parameters the core passes to the backend unmodified (except
/// `coverage`, which scales the final strength).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectSettings {
    /// RGBA; alpha is the blend factor.
    pub color: Vec4,
    pub coverage: f32,
    pub feather: f32,
    /// Persistent overlay of the effect across the entire view.
    pub overlay: f32,
    pub apply_color_to_background: bool,
    pub background_mode: BackgroundMode,
    /// Lower bound of the coverage remap; lower on constrained platforms.
    pub coverage_floor: f32,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            coverage: DEFAULT_COVERAGE,
            feather: DEFAULT_FEATHER,
            overlay: 0.0,
            apply_color_to_background: false,
            background_mode: BackgroundMode::Color,
            coverage_floor: COVERAGE_MIN,
        }
    }
}

/// How counter-translation is realised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CounterVelocityMode {
    #[default]
    Off,
    /// Offset is handed to the cage shader; the cage transform stays put.
    Shader,
    /// The cage transform itself is moved.
    Real,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterMotionSettings {
    pub enabled: bool,
    pub rotation_strength: f32,
    /// X: pitch, Y: yaw, Z: roll.
    pub rotation_per_axis: Vec3,
    pub velocity_mode: CounterVelocityMode,
    pub velocity_strength: f32,
    pub velocity_per_axis: Vec3,
    /// 0 disables the distance trigger.
    pub reset_distance: f32,
    /// 0 disables the time trigger.
    pub reset_time: f32,
}

impl Default for CounterMotionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            rotation_strength: 1.0,
            rotation_per_axis: Vec3::Y,
            velocity_mode: CounterVelocityMode::Off,
            velocity_strength: 1.0,
            velocity_per_axis: Vec3::ONE,
            reset_distance: 0.0,
            reset_time: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltSettings {
    pub enabled: bool,
    pub strength: f32,
    /// Degrees. X: pitch, Y: roll. 0 leaves that axis unclamped.
    pub max_angles: Vec2,
    pub smooth_time: f32,
}

impl Default for TiltSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            strength: 0.0,
            max_angles: Vec2::splat(DEFAULT_TILT_MAX_DEG),
            smooth_time: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramerateSettings {
    pub division: u32,
    pub divide_translation: bool,
    pub divide_rotation: bool,
}

impl Default for FramerateSettings {
    fn default() -> Self {
        Self {
            division: 1,
            divide_translation: true,
            divide_rotation: true,
        }
    }
}

impl FramerateSettings {
    pub fn active(&self) -> bool {
        self.division > 1 && (self.divide_translation || self.divide_rotation)
    }
}

/// Options the render backends pick up on every render. Each backend reads
/// the ones it understands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackendSettings {
    /// Post-process only.
    pub mask_mode: MaskMode,
    /// Post-process only.
    pub iris_z_rejection: bool,
    /// Mobile only.
    pub draw_skybox: bool,
    /// Mobile only: mask through the stencil buffer.
    pub use_mask: bool,
    pub stencil: StencilSettings,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            mask_mode: MaskMode::Off,
            iris_z_rejection: true,
            draw_skybox: false,
            use_mask: false,
            stencil: StencilSettings {
                reference: 1,
                mask: 0xff,
                bias: 1.0,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TunnellingSettings {
    pub effect: EffectSettings,
    pub angular_velocity: MotionConfig,
    pub acceleration: MotionConfig,
    pub velocity: MotionConfig,
    pub counter_motion: CounterMotionSettings,
    pub tilt: TiltSettings,
    pub framerate: FramerateSettings,
    pub backend: BackendSettings,
}

/// Stock profile: only the angular velocity channel is on.
impl Default for TunnellingSettings {
    fn default() -> Self {
        Self {
            effect: EffectSettings::default(),
            angular_velocity: MotionConfig::angular_velocity(),
            acceleration: MotionConfig::acceleration(),
            velocity: MotionConfig::velocity(),
            counter_motion: CounterMotionSettings::default(),
            tilt: TiltSettings::default(),
            framerate: FramerateSettings::default(),
            backend: BackendSettings::default(),
        }
    }
}

impl TunnellingSettings {
    /// Whether tilt or framerate division needs a motion-effect target.
    pub fn uses_motion_effect_target(&self) -> bool {
        self.tilt.enabled || self.framerate.division > 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let e = &self.effect;
        check_range("effect.coverage", e.coverage, 0.0, 1.0)?;
        check_range("effect.feather", e.feather, 0.0, FEATHER_MAX)?;
        check_range("effect.overlay", e.overlay, 0.0, 1.0)?;
        check_range("effect.coverage_floor", e.coverage_floor, 0.0, 1.0)?;

        self.angular_velocity.validate("angular_velocity")?;
        self.acceleration.validate("acceleration")?;
        self.velocity.validate("velocity")?;

        let cm = &self.counter_motion;
        check_range(
            "counter_motion.rotation_strength",
            cm.rotation_strength,
            0.0,
            COUNTER_STRENGTH_MAX,
        )?;
        check_range(
            "counter_motion.velocity_strength",
            cm.velocity_strength,
            0.0,
            COUNTER_STRENGTH_MAX,
        )?;
        check_vec3("counter_motion.rotation_per_axis", cm.rotation_per_axis)?;
        check_vec3("counter_motion.velocity_per_axis", cm.velocity_per_axis)?;
        check_range("counter_motion.reset_distance", cm.reset_distance, 0.0, f32::MAX)?;
        check_range("counter_motion.reset_time", cm.reset_time, 0.0, f32::MAX)?;

        check_finite("tilt.strength", self.tilt.strength)?;
        check_range("tilt.max_angles.x", self.tilt.max_angles.x, 0.0, 180.0)?;
        check_range("tilt.max_angles.y", self.tilt.max_angles.y, 0.0, 180.0)?;
        check_range("tilt.smooth_time", self.tilt.smooth_time, 0.0, TILT_SMOOTH_TIME_MAX)?;

        check_finite("backend.stencil.bias", self.backend.stencil.bias)?;

        if !(1..=FPSDIV_MAX).contains(&self.framerate.division) {
            return Err(ConfigError::FramerateDivision(self.framerate.division));
        }
        Ok(())
    }
}

fn check_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    check_finite(field, value)?;
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_vec3(field: &'static str, v: Vec3) -> Result<(), ConfigError> {
    for c in v.to_array() {
        check_finite(field, c)?;
    }
    Ok(())
}
