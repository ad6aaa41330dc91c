//! Fish body silhouette laid over a pattern
//!
//! Along the body axis `x` in [0, 1] the half-thickness follows
//! `cos(π·(x^center_power − 0.5))^radius_power`: `center_power` slides the
//! thickest point toward head or tail, `radius_power` rounds the outline.

use rand::Rng;
use std::f32::consts::PI;

use super::bin_buffer::BinBuffer;
use crate::error::PondError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerShapeBody {
    pub center_power: f32,
    pub radius_power: f32,
}

impl LayerShapeBody {
    pub const SHADE_POWER: f32 = 1.8;
    pub const LIGHT_POWER: f32 = 0.5;
    pub const AMBIENT: f32 = 0.5;
    pub const CENTER_POWER_MIN: f32 = 0.1;
    pub const CENTER_POWER_MAX: f32 = 2.5;
    pub const RADIUS_POWER_MIN: f32 = 0.2;
    pub const RADIUS_POWER_MAX: f32 = 1.0;

    pub fn new(center_power: f32, radius_power: f32) -> Self {
        Self {
            center_power,
            radius_power,
        }
    }

    /// A body with parameters drawn uniformly from their valid ranges
    pub fn random<R: Rng + ?Sized>(random: &mut R) -> Self {
        Self::new(
            random.random_range(Self::CENTER_POWER_MIN..=Self::CENTER_POWER_MAX),
            random.random_range(Self::RADIUS_POWER_MIN..=Self::RADIUS_POWER_MAX),
        )
    }

    /// Body thickness ratio in [0, 1] at position `x` in [0, 1] along the body
    pub fn sample(&self, x: f32) -> f32 {
        (PI * (x.powf(self.center_power) - 0.5))
            .cos()
            .max(0.0)
            .powf(self.radius_power)
    }

    /// Brightness of the body at texture coordinate (u, v)
    ///
    /// `u` runs along the body, `v` across it. Returns `None` outside the
    /// silhouette.
    pub fn shade(&self, u: f32, v: f32) -> Option<f32> {
        let radius = 2.0 * (v - 0.5).abs();
        let edge = self.sample(u);

        if radius > edge || edge <= 0.0 {
            return None;
        }

        let shade = (1.0 - (radius / edge).powf(Self::SHADE_POWER))
            .max(0.0)
            .powf(Self::LIGHT_POWER);

        Some(shade * (1.0 - Self::AMBIENT) + Self::AMBIENT)
    }

    pub fn serialize(&self, buffer: &mut BinBuffer) {
        buffer.write_f32(self.center_power);
        buffer.write_f32(self.radius_power);
    }

    /// Read a body back, rejecting values outside their valid ranges
    pub fn deserialize(buffer: &mut BinBuffer) -> Result<Self, PondError> {
        let center_power = PondError::check_range(
            "center_power",
            buffer.read_f32()?,
            Self::CENTER_POWER_MIN,
            Self::CENTER_POWER_MAX,
        )?;
        let radius_power = PondError::check_range(
            "radius_power",
            buffer.read_f32()?,
            Self::RADIUS_POWER_MIN,
            Self::RADIUS_POWER_MAX,
        )?;

        Ok(Self::new(center_power, radius_power))
    }
}
