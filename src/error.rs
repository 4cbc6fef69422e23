use thiserror::Error;

/// Rejected configuration. Numeric edge cases inside a tick never produce one
/// of these; they degrade to a zero contribution instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("framerate division {0} is outside [1, {max}]", max = crate::constants::FPSDIV_MAX)]
    FramerateDivision(u32),
}
