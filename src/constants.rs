/// Motion and compositing tuning constants.
///
/// These constants express intended behavior (ranges, floors, time limits) and
/// keep magic numbers out of the per-frame code.
// Coverage floor: the vignette never fully opens, nor fully closes at max coverage
pub const COVERAGE_MIN: f32 = 0.65;
pub const COVERAGE_MIN_CONSTRAINED: f32 = 0.40; // consoles / low-FOV headsets

// Parameter ranges
pub const FEATHER_MAX: f32 = 0.5; // fraction of screen
pub const MOTION_STRENGTH_MAX: f32 = 2.0;
pub const COUNTER_STRENGTH_MAX: f32 = 2.0;
pub const FPSDIV_MAX: u32 = 60;
pub const TILT_SMOOTH_TIME_MAX: f32 = 0.5; // seconds

// Frame time floor (seconds) used before any division by dt
pub const DT_MIN: f32 = 1e-6;

// Tilt smoothing speed cap (log-compressed m/s² per second)
pub const TILT_SMOOTH_MAX_SPEED: f32 = 1000.0;

// Post-process iris is drawn slightly inside the image-effect aperture
pub const IRIS_INNER_SCALE: f32 = 0.98;
// Inverse projection [3][3] override: hard-codes far clip to 500 units
pub const FAR_CLIP_CORRECTION: f32 = 0.002;

// Missing motion target warning cadence (seconds of effect time)
pub const MISSING_TARGET_WARN_INTERVAL_SEC: f32 = 5.0;

// Defaults for the three motion channels
pub const DEFAULT_SMOOTHING_SEC: f32 = 0.15;
pub const DEFAULT_ANGULAR_VELOCITY_MAX: f32 = 180.0; // deg/s
pub const DEFAULT_COVERAGE: f32 = 0.75;
pub const DEFAULT_FEATHER: f32 = 0.1;
pub const DEFAULT_TILT_MAX_DEG: f32 = 5.0;
