//! Arc segment geometry for river corridors
//!
//! An arc segment is a piece of circle centerline defined by:
//! - center: the circle center in scene space
//! - radius: centerline distance from the center
//! - angle_start, angle_end: angular extent, with angle_end >= angle_start
//!
//! Angles follow scene space, where y points down, so increasing angles sweep
//! clockwise on screen. The end angle may exceed 2π; only the span matters.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{cartesian_to_polar, polar_to_cartesian};

/// A circular arc centerline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    pub center: Vec2,
    pub radius: f32,
    pub angle_start: f32,
    pub angle_end: f32,
}

impl ArcSegment {
    pub fn new(center: Vec2, radius: f32, angle_start: f32, angle_end: f32) -> Self {
        Self {
            center,
            radius,
            angle_start,
            angle_end,
        }
    }

    /// Angular span of the arc
    #[inline]
    pub fn angular_span(&self) -> f32 {
        self.angle_end - self.angle_start
    }

    /// Check if an angle is within the arc's angular extent (handles wraparound)
    pub fn contains_angle(&self, theta: f32) -> bool {
        (theta - self.angle_start).rem_euclid(std::f32::consts::TAU) <= self.angular_span()
    }

    /// Distance from the arc center and bearing of a point
    #[inline]
    pub fn polar(&self, point: Vec2) -> (f32, f32) {
        cartesian_to_polar(point - self.center)
    }

    /// Point on the centerline at the given angle
    #[inline]
    pub fn point_at(&self, theta: f32) -> Vec2 {
        self.center + polar_to_cartesian(self.radius, theta)
    }

    /// Unit tangent at the given angle, pointing toward increasing angles
    #[inline]
    pub fn tangent_at(&self, theta: f32) -> Vec2 {
        Vec2::new(-theta.sin(), theta.cos())
    }
}
