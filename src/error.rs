//! Error types shared across the crate

use thiserror::Error;

/// Things which can go wrong while loading parameters or laying out the pond.
#[derive(Debug, Error)]
pub enum PondError {
    #[error("{field} = {value} is outside the valid range [{min}, {max}]")]
    RangeViolation {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("Unexpected end of buffer: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },

    #[error("Viewport {width}x{height} must have positive, finite dimensions")]
    InvalidViewport { width: f32, height: f32 },

    #[error("Flare radius {radius} must be positive and finite")]
    DegenerateFlare { radius: f32 },

    #[error("Unable to parse settings")]
    Settings(#[from] serde_json::Error),

    #[error("Unable to access settings file")]
    Io(#[from] std::io::Error),
}

impl PondError {
    /// Check that a deserialized value lies inside `[min, max]`.
    ///
    /// NaN never passes.
    pub fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<f32, Self> {
        if value >= min && value <= max {
            Ok(value)
        } else {
            Err(Self::RangeViolation {
                field,
                value,
                min,
                max,
            })
        }
    }
}
