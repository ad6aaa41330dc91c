//! Koi Pond - fish swimming in constrained ponds over a rippling water surface
//!
//! Core modules:
//! - `sim`: Pond geometry, constraints, fish and the constellation layout
//! - `pattern`: Fish body shapes, their binary form and the pattern atlas
//! - `water`: Double-buffered height field and the CPU wave stepper
//! - `renderer`: WebGPU wave passes and fish sprite batching
//! - `settings`: Quality presets and configuration structs

pub mod error;
pub mod koi;
pub mod pattern;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod water;

pub use error::PondError;
pub use koi::Koi;
pub use settings::{LayoutConfig, QualityPreset, Settings, WaveConfig};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (30 Hz, fish move slowly)
    pub const SIM_DT: f32 = 1.0 / 30.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Big pond padding, as a fraction of the big pond radius
    pub const FACTOR_PADDING: f32 = 0.1;
    /// Small pond radius relative to the big pond radius
    pub const FACTOR_SMALL: f32 = 0.7;
    /// River corridor width relative to the big pond radius
    pub const FACTOR_RIVER: f32 = 0.6;
    /// Fish capacity per square scene unit of pond area
    pub const FISH_PER_AREA: f32 = 1.0;

    /// Fish body length in scene units
    pub const FISH_LENGTH: f32 = 0.6;
    /// Fish body width relative to its length
    pub const FISH_ASPECT: f32 = 0.35;
    /// Swimming speed range in scene units per tick
    pub const FISH_SPEED_MIN: f32 = 0.01;
    pub const FISH_SPEED_MAX: f32 = 0.025;
    /// Largest wander turn applied per tick (radians)
    pub const FISH_TURN_MAX: f32 = 0.08;
    /// Radius around a fish that counts as a hit when picking
    pub const FISH_PICK_RADIUS: f32 = 0.4;

    /// Radius of the splash made by a dropped fish
    pub const SPLASH_RADIUS: f32 = 0.5;

    /// Height field damping per propagation step
    pub const WAVE_DAMPING: f32 = 0.998;
    /// Screen displacement per unit height gradient
    pub const WAVE_DISPLACEMENT: f32 = 40.0;
    /// Brightening per unit of negative gradient
    pub const WAVE_SHININESS: f32 = 90.0;
    /// Triangles in a flare fan
    pub const FLARE_PRECISION: u32 = 16;
    /// Largest flare fan whose rim indices still fit in `u16`
    pub const MAX_FLARE_PRECISION: u32 = u16::MAX as u32 - 2;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
