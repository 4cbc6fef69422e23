//! Sparse parameter overrides applied outside the tick.

use crate::backend::MaskMode;
use crate::settings::{BackgroundMode, CounterVelocityMode, MotionConfig, TunnellingSettings};
use glam::{Vec3, Vec4};
use smallvec::SmallVec;
use std::mem::discriminant;

/// One overridable parameter and the value a preset carries for it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PresetValue {
    Coverage(f32),
    Color(Vec4),
    Feather(f32),
    Overlay(f32),
    ApplyColorToBackground(bool),
    BackgroundMode(BackgroundMode),
    AngularVelocity(MotionConfig),
    Acceleration(MotionConfig),
    Velocity(MotionConfig),
    CounterMotion(bool),
    CounterRotationPerAxis(Vec3),
    CounterVelocityMode(CounterVelocityMode),
    CounterVelocityResetDistance(f32),
    CounterVelocityResetTime(f32),
    CounterVelocityStrength(f32),
    CounterVelocityPerAxis(Vec3),
    ArtificialTilt(bool),
    FramerateDivision(u32),
    DivideTranslation(bool),
    DivideRotation(bool),
    MaskMode(MaskMode),
    IrisZRejection(bool),
    DrawSkybox(bool),
    UseMask(bool),
    StencilReference(u8),
    StencilMask(u8),
    StencilBias(f32),
}

impl PresetValue {
    fn write(&self, s: &mut TunnellingSettings) {
        match *self {
            PresetValue::Coverage(v) => s.effect.coverage = v,
            PresetValue::Color(v) => s.effect.color = v,
            PresetValue::Feather(v) => s.effect.feather = v,
            PresetValue::Overlay(v) => s.effect.overlay = v,
            PresetValue::ApplyColorToBackground(v) => s.effect.apply_color_to_background = v,
            PresetValue::BackgroundMode(v) => s.effect.background_mode = v,
            PresetValue::AngularVelocity(v) => s.angular_velocity = v,
            PresetValue::Acceleration(v) => s.acceleration = v,
            PresetValue::Velocity(v) => s.velocity = v,
            PresetValue::CounterMotion(v) => s.counter_motion.enabled = v,
            PresetValue::CounterRotationPerAxis(v) => s.counter_motion.rotation_per_axis = v,
            PresetValue::CounterVelocityMode(v) => s.counter_motion.velocity_mode = v,
            PresetValue::CounterVelocityResetDistance(v) => s.counter_motion.reset_distance = v,
            PresetValue::CounterVelocityResetTime(v) => s.counter_motion.reset_time = v,
            PresetValue::CounterVelocityStrength(v) => s.counter_motion.velocity_strength = v,
            PresetValue::CounterVelocityPerAxis(v) => s.counter_motion.velocity_per_axis = v,
            PresetValue::ArtificialTilt(v) => s.tilt.enabled = v,
            PresetValue::FramerateDivision(v) => s.framerate.division = v,
            PresetValue::DivideTranslation(v) => s.framerate.divide_translation = v,
            PresetValue::DivideRotation(v) => s.framerate.divide_rotation = v,
            PresetValue::MaskMode(v) => s.backend.mask_mode = v,
            PresetValue::IrisZRejection(v) => s.backend.iris_z_rejection = v,
            PresetValue::DrawSkybox(v) => s.backend.draw_skybox = v,
            PresetValue::UseMask(v) => s.backend.use_mask = v,
            PresetValue::StencilReference(v) => s.backend.stencil.reference = v,
            PresetValue::StencilMask(v) => s.backend.stencil.mask = v,
            PresetValue::StencilBias(v) => s.backend.stencil.bias = v,
        }
    }

    /// True if both values address the same parameter.
    pub fn same_parameter(&self, other: &PresetValue) -> bool {
        discriminant(self) == discriminant(other)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresetEntry {
    pub value: PresetValue,
    /// Override flag; ignored when the preset has `override_all` set.
    pub enabled: bool,
}

/// A named, sparse set of parameter overrides.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Preset {
    pub name: String,
    pub override_all: bool,
    entries: SmallVec<[PresetEntry; 8]>,
}

impl Preset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            override_all: false,
            entries: SmallVec::new(),
        }
    }

    /// Add an enabled override, replacing any entry for the same parameter.
    pub fn with(self, value: PresetValue) -> Self {
        self.with_flag(value, true)
    }

    pub fn with_flag(mut self, value: PresetValue, enabled: bool) -> Self {
        self.set(value, enabled);
        self
    }

    pub fn override_all(mut self, on: bool) -> Self {
        self.override_all = on;
        self
    }

    pub fn set(&mut self, value: PresetValue, enabled: bool) {
        let entry = PresetEntry { value, enabled };
        match self
            .entries
            .iter_mut()
            .find(|e| e.value.same_parameter(&value))
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn entries(&self) -> &[PresetEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every overriding entry into `settings`; everything else is untouched.
    pub fn apply(&self, settings: &mut TunnellingSettings) {
        for e in self.entries.iter().filter(|e| e.enabled || self.override_all) {
            e.value.write(settings);
        }
    }
}
