//! Per-tick motion sampling from a tracked pose.
//!
//! Axis convention: +Z forward, +Y up, +X right.

use crate::constants::DT_MIN;
use glam::{Mat4, Quat, Vec3};

/// Position + orientation of a transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// World-space direction into this pose's local space.
    pub fn inverse_transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation.inverse() * direction
    }

    /// Compose a child pose expressed in this pose's local space.
    pub fn transform_pose(&self, local: &Pose) -> Pose {
        Pose {
            position: self.position + self.rotation * local.position,
            rotation: self.rotation * local.rotation,
        }
    }

    /// Express a world pose in this pose's local space.
    pub fn inverse_transform_pose(&self, world: &Pose) -> Pose {
        let inv = self.rotation.inverse();
        Pose {
            position: inv * (world.position - self.position),
            rotation: inv * world.rotation,
        }
    }

    pub fn local_to_world(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }

    pub fn world_to_local(&self) -> Mat4 {
        self.local_to_world().inverse()
    }
}

/// Values retained from the previous tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionHistory {
    pub forward: Vec3,
    pub position: Vec3,
    pub rotation: Quat,
    pub speed: f32,
    pub velocity: Vec3,
}

impl MotionHistory {
    /// Start from `pose` at rest, so the next sample sees no motion.
    pub fn at_rest(pose: &Pose) -> Self {
        Self {
            forward: pose.forward(),
            position: pose.position,
            rotation: pose.rotation,
            speed: 0.0,
            velocity: Vec3::ZERO,
        }
    }

    /// Store this tick's raw (unsmoothed) values for the next tick.
    pub fn advance(&mut self, pose: &Pose, sample: &MotionSample) {
        self.forward = pose.forward();
        self.position = pose.position;
        self.rotation = pose.rotation;
        self.speed = sample.speed;
        self.velocity = sample.velocity;
    }
}

/// Raw motion derived from two consecutive poses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    /// Floored frame time actually used for the derivatives.
    pub dt: f32,
    /// Degrees per second between the two forward vectors, always >= 0.
    pub angular_velocity: f32,
    /// World-space linear velocity.
    pub velocity: Vec3,
    pub speed: f32,
    /// `|speed - last_speed| / dt`, from unsmoothed speeds.
    pub acceleration: f32,
    /// Change in velocity per second, in the tracked target's local space.
    pub local_acceleration: Vec3,
    /// World-space position change this tick.
    pub delta_position: Vec3,
    /// Rotation from the current orientation back to last tick's.
    pub delta_rotation: Quat,
}

impl MotionSample {
    pub fn stationary(dt: f32) -> Self {
        Self {
            dt: floor_dt(dt),
            angular_velocity: 0.0,
            velocity: Vec3::ZERO,
            speed: 0.0,
            acceleration: 0.0,
            local_acceleration: Vec3::ZERO,
            delta_position: Vec3::ZERO,
            delta_rotation: Quat::IDENTITY,
        }
    }
}

/// Clamp frame time away from zero; negative and NaN become [`DT_MIN`].
#[inline]
pub fn floor_dt(dt: f32) -> f32 {
    dt.max(DT_MIN)
}

/// Unsigned angle between two vectors in degrees; 0 if either is degenerate.
pub fn angle_between_deg(from: Vec3, to: Vec3) -> f32 {
    let denom = (from.length_squared() * to.length_squared()).sqrt();
    if denom < 1e-15 {
        return 0.0;
    }
    let dot = (from.dot(to) / denom).clamp(-1.0, 1.0);
    dot.acos().to_degrees()
}

/// Derive raw motion from the current pose and the retained history.
pub fn sample(current: &Pose, last: &MotionHistory, dt: f32) -> MotionSample {
    let dt = floor_dt(dt);

    let angular_velocity = angle_between_deg(last.forward, current.forward()) / dt;

    let delta_position = current.position - last.position;
    let velocity = delta_position / dt;
    let speed = velocity.length();
    let acceleration = (speed - last.speed).abs() / dt;
    let local_acceleration = current.inverse_transform_direction(velocity - last.velocity) / dt;

    MotionSample {
        dt,
        angular_velocity,
        velocity,
        speed,
        acceleration,
        local_acceleration,
        delta_position,
        delta_rotation: current.rotation.inverse() * last.rotation,
    }
}
