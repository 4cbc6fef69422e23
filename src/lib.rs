//! Motion-driven comfort vignetting for VR head-mounted displays.
//!
//! A [`TunnellingEffect`] is ticked once per rendered frame with the tracked
//! head pose. It produces a vignette strength in `[0, 1]` plus the auxiliary
//! poses for counter-motion, artificial tilt and framerate division, and hands
//! them to a [`RenderBackend`].

pub mod angle;
pub mod backend;
pub mod constants;
pub mod counter_motion;
pub mod diagnostics;
pub mod effect;
pub mod error;
pub mod framerate;
pub mod motion;
pub mod preset;
pub mod registry;
pub mod settings;
pub mod smoothing;
pub mod strength;
pub mod tilt;

pub use angle::{Angle, Angle3, AngleType};
pub use backend::{
    EyeMatrices, MaskObjectId, MobileBackend, PostProcessBackend, RenderBackend, StereoCamera,
    VignetteParams,
};
pub use counter_motion::{Cage, CounterMotionState};
pub use diagnostics::{Diagnostics, RawMotion};
pub use effect::{FrameOutput, TunnellingEffect};
pub use error::ConfigError;
pub use motion::{MotionSample, Pose};
pub use preset::{Preset, PresetValue};
pub use registry::{EffectRegistry, RenderTargetId};
pub use settings::*;
pub use tilt::{EffectTarget, TargetId};
