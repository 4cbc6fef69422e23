//! Degree-based angle canonicalization.
//!
//! Every [`Angle`] stores its value in `[0, 360)`. Arithmetic re-normalizes
//! after each operation and comparisons use the canonical value directly, so
//! `Angle::new(10.0) == Angle::new(370.0)`.
//!
//! Euler helpers use the Y-X-Z composition (`yaw * pitch * roll`) with
//! components stored as `(pitch, yaw, roll)` in degrees.

use glam::{EulerRot, Quat, Vec3};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Canonical ranges an angle can be expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngleType {
    /// `[0, 360)`
    Angle,
    /// `(-180, 180]`
    Acute,
    /// `[180, 360)` or `[-360, -180)`
    Reflex,
}

/// Wrap `t` into `[0, length)`.
#[inline]
fn repeat(t: f32, length: f32) -> f32 {
    let r = (t - (t / length).floor() * length).clamp(0.0, length);
    // tiny negative inputs can round up to exactly `length`
    if r >= length {
        0.0
    } else {
        r
    }
}

/// Convert a raw degree value into the requested canonical range.
///
/// Non-finite input yields NaN.
pub fn to_angle(degrees: f32, kind: AngleType) -> f32 {
    let a = repeat(degrees, 360.0);
    match kind {
        AngleType::Angle => a,
        AngleType::Acute if a > 180.0 => a - 360.0,
        AngleType::Reflex if a < 180.0 => a - 360.0,
        _ => a,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Angle(f32);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    pub fn new(degrees: f32) -> Self {
        Self(to_angle(degrees, AngleType::Angle))
    }

    /// Canonical value in `[0, 360)`.
    pub fn degrees(self) -> f32 {
        self.0
    }

    pub fn acute(self) -> f32 {
        to_angle(self.0, AngleType::Acute)
    }

    pub fn reflex(self) -> f32 {
        to_angle(self.0, AngleType::Reflex)
    }

    pub fn to_float(self, kind: AngleType) -> f32 {
        to_angle(self.0, kind)
    }

    pub fn to_radians(self) -> f32 {
        self.0.to_radians()
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle::new(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle::new(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle::new(-self.0)
    }
}

impl Mul<f32> for Angle {
    type Output = Angle;
    fn mul(self, rhs: f32) -> Angle {
        Angle::new(self.0 * rhs)
    }
}

impl Div<f32> for Angle {
    type Output = Angle;
    fn div(self, rhs: f32) -> Angle {
        Angle::new(self.0 / rhs)
    }
}

/// Three canonical angles: pitch (x), yaw (y), roll (z).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Angle3 {
    pub x: Angle,
    pub y: Angle,
    pub z: Angle,
}

impl Angle3 {
    pub const ZERO: Angle3 = Angle3 {
        x: Angle::ZERO,
        y: Angle::ZERO,
        z: Angle::ZERO,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x: Angle::new(x),
            y: Angle::new(y),
            z: Angle::new(z),
        }
    }

    pub fn from_euler(euler_degrees: Vec3) -> Self {
        Self::new(euler_degrees.x, euler_degrees.y, euler_degrees.z)
    }

    pub fn from_quat(rotation: Quat) -> Self {
        Self::from_euler(quat_to_euler(rotation))
    }

    pub fn euler_angles(self) -> Vec3 {
        self.to_euler(AngleType::Angle)
    }

    pub fn euler_acute(self) -> Vec3 {
        self.to_euler(AngleType::Acute)
    }

    pub fn euler_reflex(self) -> Vec3 {
        self.to_euler(AngleType::Reflex)
    }

    pub fn to_euler(self, kind: AngleType) -> Vec3 {
        Vec3::new(
            self.x.to_float(kind),
            self.y.to_float(kind),
            self.z.to_float(kind),
        )
    }

    pub fn to_quat(self) -> Quat {
        euler_to_quat(self.euler_angles())
    }

    /// Single rotation equivalent to this euler triple, as (unit axis, angle).
    pub fn to_axis_angle(self) -> (Vec3, Angle) {
        let (axis, radians) = self.to_quat().to_axis_angle();
        (axis, Angle::new(radians.to_degrees()))
    }
}

impl fmt::Display for Angle3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

impl Add for Angle3 {
    type Output = Angle3;
    fn add(self, rhs: Angle3) -> Angle3 {
        Angle3 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Angle3 {
    type Output = Angle3;
    fn sub(self, rhs: Angle3) -> Angle3 {
        Angle3 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Mul<f32> for Angle3 {
    type Output = Angle3;
    fn mul(self, rhs: f32) -> Angle3 {
        Angle3 {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

/// Build a rotation from `(pitch, yaw, roll)` degrees: yaw, then pitch, then roll.
pub fn euler_to_quat(euler_degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler_degrees.y.to_radians(),
        euler_degrees.x.to_radians(),
        euler_degrees.z.to_radians(),
    )
}

/// Inverse of [`euler_to_quat`]; components are canonicalized to `[0, 360)`.
pub fn quat_to_euler(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(
        to_angle(pitch.to_degrees(), AngleType::Angle),
        to_angle(yaw.to_degrees(), AngleType::Angle),
        to_angle(roll.to_degrees(), AngleType::Angle),
    )
}
