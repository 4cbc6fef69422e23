//! Counter-rotation and counter-translation of the cage.

use crate::angle::{euler_to_quat, Angle3};
use crate::motion::{MotionSample, Pose};
use crate::settings::{CounterMotionSettings, CounterVelocityMode};
use glam::{Quat, Vec3};

/// Static reference scene shown in the vignette. Poses are in tracking space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cage {
    pub initial: Pose,
    pub pose: Pose,
}

impl Cage {
    pub fn new(initial: Pose) -> Self {
        Self {
            initial,
            pose: initial,
        }
    }

    pub fn reset(&mut self) {
        self.pose = self.initial;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterMotionState {
    pub rotation: Quat,
    pub translation: Vec3,
    /// Seconds since the last reset.
    pub reset_timer: f32,
    /// Accumulated distance at the last distance-triggered reset.
    pub last_reset_trigger_distance: f32,
}

impl Default for CounterMotionState {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
            reset_timer: 0.0,
            last_reset_trigger_distance: 0.0,
        }
    }
}

/// Orientation delta opposing `delta_rotation`, scaled per axis.
pub fn counter_rotation_delta(delta_rotation: Quat, settings: &CounterMotionSettings) -> Quat {
    let ea = Angle3::from_quat(delta_rotation).euler_acute()
        * settings.rotation_per_axis
        * settings.rotation_strength;
    if !ea.is_finite() {
        return Quat::IDENTITY;
    }
    euler_to_quat(ea)
}

#[derive(Clone, Debug, PartialEq)]
pub struct CounterMotion {
    state: CounterMotionState,
    prev_enabled: bool,
    last_mode: CounterVelocityMode,
}

impl CounterMotion {
    pub fn new(settings: &CounterMotionSettings) -> Self {
        Self {
            state: CounterMotionState::default(),
            prev_enabled: settings.enabled,
            last_mode: settings.velocity_mode,
        }
    }

    pub fn state(&self) -> &CounterMotionState {
        &self.state
    }

    /// Offset handed to the cage shader; zero unless in shader mode.
    pub fn shader_offset(&self, settings: &CounterMotionSettings) -> Vec3 {
        match settings.velocity_mode {
            CounterVelocityMode::Shader => self.state.translation,
            _ => Vec3::ZERO,
        }
    }

    /// Clear the accumulators and put the cage back where it started.
    pub fn reset(&mut self, cage: Option<&mut Cage>) {
        self.state = CounterMotionState {
            last_reset_trigger_distance: self.state.last_reset_trigger_distance,
            ..CounterMotionState::default()
        };
        if let Some(cage) = cage {
            cage.reset();
        }
    }

    /// Accumulate this tick's motion.
    ///
    /// `target_rotation` is the tracked target's current world orientation.
    /// Returns true if the accumulators were reset during this call.
    pub fn update(
        &mut self,
        settings: &CounterMotionSettings,
        sample: &MotionSample,
        target_rotation: Quat,
        mut cage: Option<&mut Cage>,
    ) -> bool {
        let mut did_reset = false;
        if settings.enabled != self.prev_enabled {
            self.prev_enabled = settings.enabled;
            if settings.enabled {
                self.reset(cage.as_deref_mut());
                did_reset = true;
            }
        }
        if !settings.enabled {
            return did_reset;
        }
        if settings.velocity_mode != self.last_mode {
            log::debug!(
                "[counter] mode {:?} -> {:?}",
                self.last_mode,
                settings.velocity_mode
            );
            self.last_mode = settings.velocity_mode;
            self.reset(cage.as_deref_mut());
            did_reset = true;
        }

        if settings.rotation_strength > 0.0 {
            let q = counter_rotation_delta(sample.delta_rotation, settings);
            self.state.rotation = (q * self.state.rotation).normalize();
            if let Some(cage) = cage.as_deref_mut() {
                let back = euler_to_quat(-Angle3::from_quat(q).euler_acute());
                cage.pose.rotation = (cage.pose.rotation * back).normalize();
            }
        }

        if settings.velocity_mode != CounterVelocityMode::Off && settings.velocity_strength > 0.0 {
            let d =
                sample.delta_position * settings.velocity_per_axis * settings.velocity_strength;
            let frame = match settings.velocity_mode {
                CounterVelocityMode::Shader => {
                    cage.as_deref().map_or(Quat::IDENTITY, |c| c.pose.rotation)
                }
                _ => target_rotation,
            };
            // A bad orientation must not poison the accumulator for good
            let step = frame.inverse() * d;
            if step.is_finite() {
                self.state.translation += step;
                if settings.velocity_mode == CounterVelocityMode::Real {
                    if let Some(cage) = cage.as_deref_mut() {
                        cage.pose.position = cage.initial.position + self.state.translation;
                    }
                }
            }
        }

        self.state.reset_timer += sample.dt;
        let mut trigger = false;
        if settings.reset_time > 0.0 && self.state.reset_timer >= settings.reset_time {
            trigger = true;
        }
        let travelled = self.state.translation.length_squared();
        if settings.reset_distance > 0.0
            && travelled >= settings.reset_distance * settings.reset_distance
        {
            self.state.last_reset_trigger_distance = travelled.sqrt();
            trigger = true;
        }
        if trigger {
            log::debug!("[counter] reset after {:.2}s", self.state.reset_timer);
            self.reset(cage);
            did_reset = true;
        }
        did_reset
    }
}
