//! Artificial tilt: lean the motion-effect target in response to the tracked
//! target's local acceleration.

use crate::angle::{euler_to_quat, Angle3};
use crate::constants::TILT_SMOOTH_MAX_SPEED;
use crate::motion::Pose;
use crate::settings::TiltSettings;
use crate::smoothing::SmoothedVec3;
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u32);

/// Transform driven by tilt and framerate division. `local` is expressed in
/// the tracked motion target's space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectTarget {
    pub id: TargetId,
    pub local: Pose,
}

impl EffectTarget {
    pub fn new(id: TargetId, local: Pose) -> Self {
        Self { id, local }
    }

    /// World pose under the given motion-target pose.
    pub fn world(&self, parent: &Pose) -> Pose {
        parent.transform_pose(&self.local)
    }
}

/// `sign(a) * ln(|a| + 1)` per axis.
pub fn compress_acceleration(a: Vec3) -> Vec3 {
    let f = |v: f32| {
        let sign = if v < 0.0 { -1.0 } else { 1.0 };
        sign * (v.abs() + 1.0).ln()
    };
    Vec3::new(f(a.x), f(a.y), f(a.z))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArtificialTilt {
    initial: Angle3,
    accel: SmoothedVec3,
    prev_enabled: bool,
    target: Option<TargetId>,
}

impl ArtificialTilt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orientation captured at the last (re)initialisation.
    pub fn initial(&self) -> Angle3 {
        self.initial
    }

    pub fn smoothed_acceleration(&self) -> Vec3 {
        self.accel.value
    }

    /// Capture `target`'s current orientation and clear smoothing.
    pub fn capture(&mut self, target: Option<&EffectTarget>) {
        self.accel.reset();
        self.initial = target.map_or(Angle3::ZERO, |t| Angle3::from_quat(t.local.rotation));
        self.target = target.map(|t| t.id);
    }

    /// Put `target` back to the orientation it had before tilt was applied.
    pub fn restore(&self, target: &mut EffectTarget) {
        if self.target == Some(target.id) {
            target.local.rotation = euler_to_quat(self.initial.euler_acute());
        }
    }

    /// Re-initialise when the enable flag or the target changed since the
    /// last call. Returns true if it did.
    pub fn sync(&mut self, enabled: bool, target: Option<&mut EffectTarget>) -> bool {
        let id = target.as_ref().map(|t| t.id);
        if enabled == self.prev_enabled && id == self.target {
            return false;
        }
        self.prev_enabled = enabled;
        match target {
            Some(t) => {
                self.restore(t);
                self.capture(Some(&*t));
            }
            None => self.capture(None),
        }
        true
    }

    /// Advance the filter with this tick's local acceleration and write the
    /// tilted orientation to `target`. Returns the applied tilt `(pitch, 0, roll)`.
    pub fn update(
        &mut self,
        settings: &TiltSettings,
        local_acceleration: Vec3,
        dt: f32,
        target: &mut EffectTarget,
    ) -> Vec3 {
        let mut compressed = compress_acceleration(local_acceleration);
        if !compressed.is_finite() {
            compressed = Vec3::ZERO;
        }
        let s = self.accel.update(
            compressed,
            settings.smooth_time,
            TILT_SMOOTH_MAX_SPEED,
            dt,
        );

        let mut tilt =
            Angle3::new(s.z * settings.strength, 0.0, s.x * settings.strength).euler_acute();
        if settings.max_angles.x > 0.0 {
            tilt.x = tilt.x.clamp(-settings.max_angles.x, settings.max_angles.x);
        }
        if settings.max_angles.y > 0.0 {
            tilt.z = tilt.z.clamp(-settings.max_angles.y, settings.max_angles.y);
        }

        let applied = self.initial + Angle3::from_euler(tilt);
        target.local.rotation = euler_to_quat(applied.euler_acute());
        tilt
    }
}
