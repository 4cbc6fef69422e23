//! Typed debug surface: forced strength, all-channel analysis and the raw
//! motion values observed by the sampler.

/// Unprocessed channel magnitudes in their native units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawMotion {
    /// Degrees per second.
    pub angular_velocity: f32,
    /// Metres per second squared.
    pub acceleration: f32,
    /// Metres per second.
    pub velocity: f32,
}

impl RawMotion {
    fn max(self, other: RawMotion) -> RawMotion {
        RawMotion {
            angular_velocity: self.angular_velocity.max(other.angular_velocity),
            acceleration: self.acceleration.max(other.acceleration),
            velocity: self.velocity.max(other.velocity),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    /// Replace the computed strength with `force_value` (still coverage-remapped).
    pub force_on: bool,
    pub force_value: f32,
    /// Run every channel; user-disabled channels contribute with strength 0.
    pub analyze_all_channels: bool,
    last: RawMotion,
    peak: RawMotion,
    missing_target: bool,
    missing_warnings: u32,
}

impl Diagnostics {
    pub fn last_motion(&self) -> RawMotion {
        self.last
    }

    /// Largest raw values seen since the last [`Diagnostics::reset_peaks`].
    pub fn peak_motion(&self) -> RawMotion {
        self.peak
    }

    pub fn reset_peaks(&mut self) {
        self.peak = RawMotion::default();
    }

    pub fn missing_target(&self) -> bool {
        self.missing_target
    }

    /// Missing-target warnings logged so far.
    pub fn missing_target_warnings(&self) -> u32 {
        self.missing_warnings
    }

    pub(crate) fn record(&mut self, raw: RawMotion) {
        self.last = raw;
        self.peak = self.peak.max(raw);
    }

    pub(crate) fn set_missing_target(&mut self, missing: bool) {
        self.missing_target = missing;
    }

    pub(crate) fn count_missing_warning(&mut self) {
        self.missing_warnings += 1;
    }
}
