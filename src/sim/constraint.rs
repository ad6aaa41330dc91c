//! Constraint shapes that keep fish inside ponds and rivers
//!
//! Every region is either a circle or a corridor swept along connected arcs.
//! Both answer the same two questions: does the region contain a point, and
//! where is the nearest admissible point to a point outside it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arc::ArcSegment;
use crate::polar_to_cartesian;

/// A circular pond region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstraintCircle {
    pub center: Vec2,
    /// Always positive
    pub radius: f32,
}

impl ConstraintCircle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        debug_assert!(radius > 0.0, "circle radius must be positive");
        Self { center, radius }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        Vec2::new(x, y).distance(self.center) <= self.radius
    }

    /// Nearest point inside the circle
    pub fn project(&self, point: Vec2) -> Vec2 {
        let offset = point - self.center;
        let distance = offset.length();

        if distance <= self.radius {
            point
        } else {
            self.center + offset * (self.radius / distance)
        }
    }

    /// Area of the circle
    #[inline]
    pub fn area(&self) -> f32 {
        std::f32::consts::PI * self.radius * self.radius
    }
}

/// A corridor of constant width swept along a chain of arcs
///
/// Consecutive arcs are expected to meet end to end; this is established
/// when the path is built and not checked afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintArcPath {
    pub arcs: Vec<ArcSegment>,
    /// Full corridor width, centered on the arc centerlines
    pub width: f32,
}

impl ConstraintArcPath {
    pub fn new(arcs: Vec<ArcSegment>, width: f32) -> Self {
        Self { arcs, width }
    }

    #[inline]
    fn half_width(&self) -> f32 {
        self.width * 0.5
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        let point = Vec2::new(x, y);
        let half_width = self.half_width();

        self.arcs.iter().any(|arc| {
            let (r, theta) = arc.polar(point);
            arc.contains_angle(theta) && (r - arc.radius).abs() <= half_width
        })
    }

    /// Nearest point inside the corridor, or `None` when no arc covers the
    /// point's bearing. The first arc wins ties.
    pub fn project(&self, point: Vec2) -> Option<Vec2> {
        let half_width = self.half_width();
        let mut nearest: Option<(f32, Vec2)> = None;

        for arc in &self.arcs {
            let (r, theta) = arc.polar(point);

            if !arc.contains_angle(theta) {
                continue;
            }

            let distance = (r - arc.radius).abs();

            if nearest.is_some_and(|(best, _)| distance >= best) {
                continue;
            }

            let projected = if distance <= half_width {
                point
            } else {
                let clamped = r.clamp(arc.radius - half_width, arc.radius + half_width);
                arc.center + polar_to_cartesian(clamped, theta)
            };

            nearest = Some((distance, projected));
        }

        nearest.map(|(_, projected)| projected)
    }
}

/// Any region a pond can occupy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    Circle(ConstraintCircle),
    ArcPath(ConstraintArcPath),
}

impl Constraint {
    /// Check whether a point lies inside the region
    pub fn contains(&self, x: f32, y: f32) -> bool {
        match self {
            Constraint::Circle(circle) => circle.contains(x, y),
            Constraint::ArcPath(path) => path.contains(x, y),
        }
    }

    /// Nearest admissible point to `point`
    ///
    /// Returns the point itself when it is already contained, and `None` when
    /// the region cannot resolve it.
    pub fn project(&self, point: Vec2) -> Option<Vec2> {
        match self {
            Constraint::Circle(circle) => Some(circle.project(point)),
            Constraint::ArcPath(path) => path.project(point),
        }
    }

    /// Move `point` onto the region if it lies outside
    ///
    /// Returns true when the point was moved. A point that is already
    /// contained, or that the region cannot resolve, is left untouched.
    pub fn constrain(&self, point: &mut Vec2) -> bool {
        match self.project(*point) {
            Some(projected) if projected != *point => {
                *point = projected;
                true
            }
            _ => false,
        }
    }

    /// Map a point from an older version of this region onto this one
    ///
    /// Circles keep the point's relative placement; everything else falls
    /// back to projection.
    pub fn transfer(&self, previous: &Constraint, point: Vec2) -> Option<Vec2> {
        match (previous, self) {
            (Constraint::Circle(from), Constraint::Circle(to)) => {
                let relative = (point - from.center) / from.radius;
                Some(to.project(to.center + relative * to.radius))
            }
            _ => self.project(point),
        }
    }
}

impl From<ConstraintCircle> for Constraint {
    fn from(circle: ConstraintCircle) -> Self {
        Constraint::Circle(circle)
    }
}

impl From<ConstraintArcPath> for Constraint {
    fn from(path: ConstraintArcPath) -> Self {
        Constraint::ArcPath(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn quarter_path() -> ConstraintArcPath {
        // Quarter turn around the origin from the +x axis down to the +y axis
        ConstraintArcPath::new(vec![ArcSegment::new(Vec2::ZERO, 10.0, 0.0, FRAC_PI_2)], 2.0)
    }

    #[test]
    fn test_circle_contains_boundary() {
        let circle = ConstraintCircle::new(Vec2::new(1.0, 1.0), 2.0);
        assert!(circle.contains(3.0, 1.0));
        assert!(circle.contains(1.0, 1.0));
        assert!(!circle.contains(3.1, 1.0));
    }

    #[test]
    fn test_circle_constrain_projects_radially() {
        let constraint = Constraint::from(ConstraintCircle::new(Vec2::ZERO, 5.0));
        let mut point = Vec2::new(10.0, 0.0);
        assert!(constraint.constrain(&mut point));
        assert!((point - Vec2::new(5.0, 0.0)).length() < 1e-5);

        let mut inside = Vec2::new(1.0, 2.0);
        assert!(!constraint.constrain(&mut inside));
        assert_eq!(inside, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_arc_path_contains() {
        let path = quarter_path();
        let on_centerline = polar_to_cartesian(10.0, PI / 4.0);
        assert!(path.contains(on_centerline.x, on_centerline.y));

        let edge = polar_to_cartesian(10.9, PI / 4.0);
        assert!(path.contains(edge.x, edge.y));

        let outside_band = polar_to_cartesian(11.5, PI / 4.0);
        assert!(!path.contains(outside_band.x, outside_band.y));

        // Right radius, wrong bearing
        assert!(!path.contains(-10.0, 0.0));
    }

    #[test]
    fn test_arc_path_constrain_clamps_into_band() {
        let constraint = Constraint::from(quarter_path());
        let mut point = polar_to_cartesian(15.0, PI / 4.0);
        assert!(constraint.constrain(&mut point));
        assert!((point.length() - 11.0).abs() < 1e-4);
        assert!((point.y.atan2(point.x) - PI / 4.0).abs() < 1e-5);

        let mut inner = polar_to_cartesian(3.0, PI / 3.0);
        assert!(constraint.constrain(&mut inner));
        assert!((inner.length() - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_arc_path_unresolvable_bearing() {
        let constraint = Constraint::from(quarter_path());
        let mut point = Vec2::new(-20.0, -20.0);
        assert_eq!(constraint.project(point), None);
        assert!(!constraint.constrain(&mut point));
        assert_eq!(point, Vec2::new(-20.0, -20.0));
    }

    #[test]
    fn test_arc_path_prefers_nearest_then_first() {
        // Two concentric arcs, the point is nearer the second
        let path = ConstraintArcPath::new(
            vec![
                ArcSegment::new(Vec2::ZERO, 10.0, 0.0, FRAC_PI_2),
                ArcSegment::new(Vec2::ZERO, 20.0, 0.0, FRAC_PI_2),
            ],
            2.0,
        );
        let projected = path.project(polar_to_cartesian(17.0, 0.5)).unwrap();
        assert!((projected.length() - 19.0).abs() < 1e-4);

        // Equidistant: the first arc wins
        let tie = path.project(Vec2::new(15.0, 0.0)).unwrap();
        assert!((tie.length() - 11.0).abs() < 1e-4);
    }

    #[test]
    fn test_transfer_keeps_relative_placement() {
        let from = Constraint::from(ConstraintCircle::new(Vec2::ZERO, 10.0));
        let to = Constraint::from(ConstraintCircle::new(Vec2::new(100.0, 0.0), 5.0));
        let moved = to.transfer(&from, Vec2::new(5.0, 0.0)).unwrap();
        assert!((moved - Vec2::new(102.5, 0.0)).length() < 1e-4);
    }
}
