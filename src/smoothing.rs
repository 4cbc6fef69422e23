//! Critically-damped "smooth damp" filters.
//!
//! A smoothing time of zero (or less) is a direct pass-through: the target is
//! returned immediately and the slew term is cleared.

use glam::Vec3;

#[inline]
fn damping_factor(omega: f32, dt: f32) -> f32 {
    let x = omega * dt;
    1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x)
}

/// Move `current` toward `target`, updating the slew `velocity` in place.
///
/// `max_speed` caps the rate of change (use `f32::INFINITY` for no cap).
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> f32 {
    if smooth_time <= 0.0 {
        *velocity = 0.0;
        return target;
    }
    let omega = 2.0 / smooth_time;
    let exp = damping_factor(omega, dt);

    let max_change = max_speed * smooth_time;
    let change = (current - target).clamp(-max_change, max_change);
    let clamped_target = current - change;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = clamped_target + (change + temp) * exp;

    // No overshoot past the original target
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }
    output
}

/// Vector form of [`smooth_damp`]; the speed cap applies to the whole vector.
pub fn smooth_damp_vec3(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> Vec3 {
    if smooth_time <= 0.0 {
        *velocity = Vec3::ZERO;
        return target;
    }
    let omega = 2.0 / smooth_time;
    let exp = damping_factor(omega, dt);

    let max_change = max_speed * smooth_time;
    let mut change = current - target;
    let sq = change.length_squared();
    if sq > max_change * max_change {
        change = change / sq.sqrt() * max_change;
    }
    let clamped_target = current - change;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = clamped_target + (change + temp) * exp;

    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *velocity = Vec3::ZERO;
    }
    output
}

/// One smoothed scalar channel: current value plus its slew term.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SmoothedSignal {
    pub value: f32,
    pub slew: f32,
}

impl SmoothedSignal {
    pub fn update(&mut self, target: f32, smooth_time: f32, dt: f32) -> f32 {
        self.value = smooth_damp(
            self.value,
            target,
            &mut self.slew,
            smooth_time,
            f32::INFINITY,
            dt,
        );
        self.value
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SmoothedVec3 {
    pub value: Vec3,
    pub slew: Vec3,
}

impl SmoothedVec3 {
    pub fn update(&mut self, target: Vec3, smooth_time: f32, max_speed: f32, dt: f32) -> Vec3 {
        self.value = smooth_damp_vec3(
            self.value,
            target,
            &mut self.slew,
            smooth_time,
            max_speed,
            dt,
        );
        self.value
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
