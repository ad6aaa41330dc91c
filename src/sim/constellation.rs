//! Pond constellation: a big pond, a small pond and the river between them
//!
//! The layout is computed in closed form from the viewport. The big pond sits
//! in the top left corner, the small pond in the bottom right corner, and a
//! two-arc river hugs the outside of both ponds. One end of the river meets
//! between the ponds; the other runs off the viewport edge, which is where
//! new fish enter.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::arc::ArcSegment;
use super::constraint::{Constraint, ConstraintArcPath, ConstraintCircle};
use super::fish::Fish;
use super::pond::Pond;
use crate::error::PondError;
use crate::pattern::PatternAtlas;
use crate::renderer::FishBatch;
use crate::settings::LayoutConfig;

/// Angle by which the spawn point is pulled inside the river's open end
const SPAWN_NUDGE: f32 = 1.0e-4;

/// Big pond radius at which big pond, river and small pond exactly span the
/// diagonal from (0, 0) to (width, height)
///
/// Solves `a·R² + b·R − c = 0` for the smaller positive root, where the
/// center distance `|(W, H) − (1 + small)·R·(1, 1)|` must equal
/// `(1 + small + river)·R`.
pub fn big_pond_radius(width: f32, height: f32, config: &LayoutConfig) -> f32 {
    let p1 = config.factor_small + 1.0;
    let a = (config.factor_river + p1) * (config.factor_river + p1) - 2.0 * p1 * p1;
    let b = (p1 + p1) * (height + width);
    let c = height * height + width * width;

    ((b * b + 4.0 * a * c).sqrt() - b) / (a + a)
}

/// Pond and river geometry for one viewport size
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Big pond radius before padding
    pub radius_big: f32,
    /// Small pond radius before padding
    pub radius_small: f32,
    /// Gap between the unpadded pond rims
    pub river_gap: f32,
    pub big: ConstraintCircle,
    pub small: ConstraintCircle,
    pub river: ConstraintArcPath,
    pub spawn_point: Vec2,
    pub spawn_direction: Vec2,
    /// The big pond radius was clamped to fit the viewport
    pub full_turn: bool,
}

/// Angular spans of the river arcs for one of the four layout cases
struct RiverSpans {
    big: (f32, f32),
    small: (f32, f32),
    /// The open end is the start (true) or end (false) of the big arc
    loose_at_start: bool,
    spawn_direction: Vec2,
}

impl RiverSpans {
    fn select(landscape: bool, full_turn: bool, turn: f32) -> Self {
        match (landscape, full_turn) {
            // Runs from between the ponds under the big pond to the bottom edge
            (true, true) => Self {
                big: (turn, FRAC_PI_2),
                small: (PI + turn, TAU),
                loose_at_start: false,
                spawn_direction: Vec2::X,
            },
            // Wraps further around the big pond to the left edge
            (true, false) => Self {
                big: (turn, PI),
                small: (PI + turn, TAU),
                loose_at_start: false,
                spawn_direction: Vec2::Y,
            },
            // Enters from the right edge beside the big pond
            (false, true) => Self {
                big: (0.0, turn),
                small: (FRAC_PI_2, PI + turn),
                loose_at_start: true,
                spawn_direction: Vec2::Y,
            },
            // Enters from the top edge above the big pond
            (false, false) => Self {
                big: (1.5 * PI, TAU + turn),
                small: (FRAC_PI_2, PI + turn),
                loose_at_start: true,
                spawn_direction: Vec2::X,
            },
        }
    }
}

impl Layout {
    pub fn fit(width: f32, height: f32, config: &LayoutConfig) -> Self {
        let radius_big_max = width.min(height) * 0.5;
        let radius_unclamped = big_pond_radius(width, height, config);
        let full_turn = radius_unclamped > radius_big_max;
        let radius_big = radius_unclamped.min(radius_big_max);
        let radius_small = config.factor_small * radius_big;
        let center_big = Vec2::splat(radius_big);
        let center_small = Vec2::new(width - radius_small, height - radius_small);
        let offset = center_small - center_big;
        let river_gap = offset.length() - radius_big - radius_small;
        let river_turn = offset.y.atan2(offset.x);

        let spans = RiverSpans::select(width > height, full_turn, river_turn);
        let arc_big = ArcSegment::new(
            center_big,
            radius_big + river_gap * 0.5,
            spans.big.0,
            spans.big.1,
        );
        let arc_small = ArcSegment::new(
            center_small,
            radius_small + river_gap * 0.5,
            spans.small.0,
            spans.small.1,
        );

        let spawn_angle = if spans.loose_at_start {
            arc_big.angle_start + SPAWN_NUDGE
        } else {
            arc_big.angle_end - SPAWN_NUDGE
        };

        Self {
            radius_big,
            radius_small,
            river_gap,
            big: ConstraintCircle::new(center_big, radius_big * (1.0 - config.factor_padding)),
            small: ConstraintCircle::new(
                center_small,
                radius_small - radius_big * config.factor_padding,
            ),
            river: ConstraintArcPath::new(
                vec![arc_big, arc_small],
                radius_big * config.factor_river,
            ),
            spawn_point: arc_big.point_at(spawn_angle),
            spawn_direction: spans.spawn_direction,
            full_turn,
        }
    }
}

pub struct Constellation {
    width: f32,
    height: f32,
    config: LayoutConfig,
    big: Pond,
    small: Pond,
    river: Pond,
    layout: Layout,
}

impl Constellation {
    pub fn new(width: f32, height: f32, config: LayoutConfig) -> Result<Self, PondError> {
        check_viewport(width, height)?;

        let layout = Layout::fit(width, height, &config);
        log::info!(
            "Constellation {}x{}: big={:.3} small={:.3} river gap={:.3} full_turn={}",
            width,
            height,
            layout.radius_big,
            layout.radius_small,
            layout.river_gap,
            layout.full_turn
        );

        Ok(Self {
            width,
            height,
            config,
            big: Pond::new(layout.big),
            small: Pond::new(layout.small),
            river: Pond::new(layout.river.clone()),
            layout,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn big(&self) -> &Pond {
        &self.big
    }

    pub fn small(&self) -> &Pond {
        &self.small
    }

    pub fn river(&self) -> &Pond {
        &self.river
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.layout.spawn_point
    }

    pub fn spawn_direction(&self) -> Vec2 {
        self.layout.spawn_direction
    }

    /// Ponds in pick and drop priority order
    fn ponds(&self) -> [&Pond; 3] {
        [&self.big, &self.small, &self.river]
    }

    fn ponds_mut(&mut self) -> [&mut Pond; 3] {
        [&mut self.big, &mut self.small, &mut self.river]
    }

    /// Recompute the layout for a new viewport and move every fish over
    pub fn resize(
        &mut self,
        width: f32,
        height: f32,
        atlas: &mut PatternAtlas,
    ) -> Result<(), PondError> {
        check_viewport(width, height)?;

        self.width = width;
        self.height = height;
        self.layout = Layout::fit(width, height, &self.config);

        let mut displaced = self.big.replace_constraint(self.layout.big.into());
        displaced.extend(self.small.replace_constraint(self.layout.small.into()));
        displaced.extend(self.river.replace_constraint(self.layout.river.clone().into()));

        log::info!(
            "Resized constellation to {}x{} (full_turn={}, {} fish re-dropped)",
            width,
            height,
            self.layout.full_turn,
            displaced.len()
        );

        for fish in displaced {
            self.drop(fish);
        }

        self.update_atlas(atlas);
        Ok(())
    }

    /// Total number of fish the ponds comfortably hold
    pub fn capacity(&self) -> usize {
        let area = self.layout.big.area() + self.layout.small.area();
        (self.config.fish_per_area * area).ceil() as usize
    }

    pub fn fish_count(&self) -> usize {
        self.ponds().iter().map(|pond| pond.len()).sum()
    }

    /// Rewrite every fish pattern into a cleared atlas
    pub fn update_atlas(&mut self, atlas: &mut PatternAtlas) {
        atlas.clear();
        for pond in self.ponds_mut() {
            pond.update_atlas(atlas);
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, atlas: &mut PatternAtlas, random: &mut R) {
        self.small.update(atlas, random);
        self.big.update(atlas, random);
        self.river.update(atlas, random);
    }

    pub fn render(&self, primitives: &mut FishBatch, time: f32) {
        self.small.render(primitives, time);
        self.big.render(primitives, time);
        self.river.render(primitives, time);
    }

    /// Take the fish at (x, y) out of the first pond that has one there
    pub fn pick(&mut self, x: f32, y: f32) -> Option<Fish> {
        self.ponds_mut()
            .into_iter()
            .find_map(|pond| pond.pick(x, y))
    }

    /// Put a fish in the pond region nearest to where it was let go
    pub fn drop(&mut self, mut fish: Fish) {
        let position = fish.position;

        if let Some(index) = self
            .ponds()
            .iter()
            .position(|pond| pond.constraint().contains(position.x, position.y))
        {
            fish.drop(position);
            self.ponds_mut()[index].add_fish(fish);
            return;
        }

        let mut nearest: Option<(usize, f32, Vec2)> = None;
        for (index, pond) in self.ponds().iter().enumerate() {
            let Some(candidate) = pond.constraint().project(position) else {
                continue;
            };
            let distance = candidate.distance(position);
            if nearest.is_none_or(|(_, best, _)| distance < best) {
                nearest = Some((index, distance, candidate));
            }
        }

        // Circles always resolve, so there is always a candidate
        let (index, distance, target) = nearest.unwrap_or((0, 0.0, position));
        log::debug!(
            "Dropped fish {} outside the ponds, moved {:.3} into pond {}",
            fish.id,
            distance,
            index
        );

        fish.drop(target);
        self.ponds_mut()[index].add_fish(fish);
    }

    /// Let a fish in through the river's open end
    pub fn spawn(&mut self, mut fish: Fish) {
        fish.drop(self.layout.spawn_point);
        fish.direction = self.layout.spawn_direction;
        self.river.add_fish(fish);
    }

    /// Region of the pond a fish would be dropped into, for hit testing
    pub fn region_at(&self, x: f32, y: f32) -> Option<&Constraint> {
        self.ponds()
            .into_iter()
            .map(Pond::constraint)
            .find(|constraint| constraint.contains(x, y))
    }
}

fn check_viewport(width: f32, height: f32) -> Result<(), PondError> {
    if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
        Ok(())
    } else {
        Err(PondError::InvalidViewport { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::LayerShapeBody;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn config() -> LayoutConfig {
        LayoutConfig::default()
    }

    fn fish_at(id: u32, position: Vec2) -> Fish {
        Fish::new(id, position, Vec2::X, 0.02, LayerShapeBody::new(1.0, 1.0))
    }

    #[test]
    fn test_unclamped_radius_spans_diagonal() {
        let layout = Layout::fit(16.0, 12.0, &config());
        assert!(!layout.full_turn);
        // Unclamped, the river gap is exactly the river factor of the big radius
        assert!((layout.river_gap - 0.6 * layout.radius_big).abs() < 1e-3);
    }

    #[test]
    fn test_landscape_full_turn_spawns_on_bottom_edge() {
        let layout = Layout::fit(100.0, 10.0, &config());
        assert!(layout.full_turn);
        assert_eq!(layout.radius_big, 5.0);
        assert_eq!(layout.spawn_direction, Vec2::X);
        assert!((layout.spawn_point.x - 5.0).abs() < 1e-2);
        assert!((layout.spawn_point.y - (10.0 + layout.river_gap * 0.5)).abs() < 1e-2);
    }

    #[test]
    fn test_landscape_unclamped_spawns_on_left_edge() {
        let layout = Layout::fit(16.0, 12.0, &config());
        assert_eq!(layout.spawn_direction, Vec2::Y);
        assert!((layout.spawn_point.x + layout.river_gap * 0.5).abs() < 1e-2);
        assert!((layout.spawn_point.y - layout.radius_big).abs() < 1e-2);
    }

    #[test]
    fn test_portrait_cases() {
        let clamped = Layout::fit(10.0, 100.0, &config());
        assert!(clamped.full_turn);
        assert_eq!(clamped.spawn_direction, Vec2::Y);
        assert!((clamped.spawn_point.x - (10.0 + clamped.river_gap * 0.5)).abs() < 1e-2);

        let unclamped = Layout::fit(12.0, 16.0, &config());
        assert!(!unclamped.full_turn);
        assert_eq!(unclamped.spawn_direction, Vec2::X);
        assert!((unclamped.spawn_point.y + unclamped.river_gap * 0.5).abs() < 1e-2);
    }

    #[test]
    fn test_river_arcs_meet_between_ponds() {
        for (width, height) in [(16.0, 12.0), (12.0, 16.0), (100.0, 10.0), (10.0, 100.0)] {
            let layout = Layout::fit(width, height, &config());
            let big = layout.river.arcs[0];
            let small = layout.river.arcs[1];
            let turn = (small.center - big.center).to_angle();
            let join_big = big.point_at(turn);
            let join_small = small.point_at(turn + PI);
            assert!(
                (join_big - join_small).length() < 1e-3,
                "{}x{}: {:?} vs {:?}",
                width,
                height,
                join_big,
                join_small
            );
        }
    }

    #[test]
    fn test_spawn_direction_flows_into_river() {
        for (width, height) in [(16.0, 12.0), (12.0, 16.0), (100.0, 10.0), (10.0, 100.0)] {
            let layout = Layout::fit(width, height, &config());
            let arc = layout.river.arcs[0];
            let (_, bearing) = arc.polar(layout.spawn_point);
            let tangent = arc.tangent_at(bearing);
            // Entering at the arc start follows the tangent; at the end it opposes it
            let toward_junction = if layout.spawn_direction.dot(tangent) > 0.0 {
                arc.contains_angle(bearing + 0.01)
            } else {
                arc.contains_angle(bearing - 0.01)
            };
            assert!(toward_junction, "{}x{}", width, height);
            assert!(layout.spawn_direction.dot(tangent).abs() > 0.999);
        }
    }

    #[test]
    fn test_invalid_viewport_rejected() {
        assert!(matches!(
            Constellation::new(0.0, 10.0, config()),
            Err(PondError::InvalidViewport { .. })
        ));
        let mut constellation = Constellation::new(16.0, 9.0, config()).unwrap();
        let mut atlas = PatternAtlas::new(4, 4);
        assert!(constellation.resize(-1.0, 9.0, &mut atlas).is_err());
        assert_eq!(constellation.width(), 16.0);
    }

    #[test]
    fn test_resize_is_history_independent() {
        let mut atlas = PatternAtlas::new(4, 8);
        let mut resized = Constellation::new(16.0, 9.0, config()).unwrap();
        resized.drop(fish_at(1, Vec2::new(3.0, 3.0)));
        resized.resize(5.0, 30.0, &mut atlas).unwrap();
        resized.resize(20.0, 11.0, &mut atlas).unwrap();

        let fresh = Constellation::new(20.0, 11.0, config()).unwrap();
        assert_eq!(resized.layout(), fresh.layout());
        assert_eq!(resized.big().constraint(), fresh.big().constraint());
        assert_eq!(resized.river().constraint(), fresh.river().constraint());
        assert_eq!(resized.fish_count(), 1);
    }

    #[test]
    fn test_drop_inside_region_keeps_position() {
        let mut constellation = Constellation::new(16.0, 9.0, config()).unwrap();
        let center = constellation.layout().big.center;
        constellation.drop(fish_at(1, center));

        assert_eq!(constellation.big().len(), 1);
        assert_eq!(constellation.small().len(), 0);
        assert_eq!(constellation.river().len(), 0);
        assert_eq!(constellation.big().fishes()[0].position, center);
    }

    #[test]
    fn test_drop_outside_moves_to_nearest_small_pond() {
        let mut constellation = Constellation::new(16.0, 9.0, config()).unwrap();
        let small = constellation.layout().small;
        // Just past the small pond rim toward the bottom right corner, away from the river
        let direction = Vec2::new(1.0, 1.0).normalize();
        let outside = small.center + direction * (small.radius + 0.05);
        assert!(constellation.region_at(outside.x, outside.y).is_none());

        constellation.drop(fish_at(1, outside));

        assert_eq!(constellation.small().len(), 1);
        let position = constellation.small().fishes()[0].position;
        assert!((position.distance(small.center) - small.radius).abs() < 1e-3);
    }

    #[test]
    fn test_pick_priority_and_removal() {
        let mut constellation = Constellation::new(16.0, 9.0, config()).unwrap();
        let center = constellation.layout().big.center;
        constellation.drop(fish_at(7, center));

        assert!(constellation.pick(0.0, 100.0).is_none());
        let picked = constellation.pick(center.x, center.y).unwrap();
        assert_eq!(picked.id, 7);
        assert_eq!(constellation.fish_count(), 0);
    }

    #[test]
    fn test_spawned_fish_swim_inside_river() {
        let mut constellation = Constellation::new(16.0, 9.0, config()).unwrap();
        let mut atlas = PatternAtlas::new(8, 8);
        let mut random = Pcg32::seed_from_u64(42);
        constellation.spawn(fish_at(1, Vec2::ZERO));

        for _ in 0..600 {
            constellation.update(&mut atlas, &mut random);
        }

        let fish = &constellation.river().fishes()[0];
        let projected = constellation.river().constraint().project(fish.position).unwrap();
        assert!(projected.distance(fish.position) < 1e-3);
    }

    #[test]
    fn test_capacity_from_padded_areas() {
        let constellation = Constellation::new(16.0, 9.0, config()).unwrap();
        let layout = constellation.layout();
        let area = PI * (layout.big.radius.powi(2) + layout.small.radius.powi(2));
        assert_eq!(constellation.capacity(), area.ceil() as usize);
    }

    #[test]
    fn test_square_viewport_seam_keeps_ponds_continuous() {
        let below = Layout::fit(10.0, 10.001, &config());
        let above = Layout::fit(10.001, 10.0, &config());
        assert!((below.radius_big - above.radius_big).abs() < 1e-3);
        assert!((below.big.center - above.big.center).length() < 1e-3);
        // Only the river's open end flips sides
        assert_ne!(below.spawn_direction, above.spawn_direction);
    }

    proptest! {
        #[test]
        fn prop_ponds_never_overlap(width in 0.5f32..4000.0, height in 0.5f32..4000.0) {
            let layout = Layout::fit(width, height, &config());
            let distance = layout.big.center.distance(layout.small.center);
            let touching = layout.radius_big + layout.radius_small;
            prop_assert!(distance >= touching * (1.0 - 1e-5));
            prop_assert!(distance >= layout.big.radius + layout.small.radius);
        }

        #[test]
        fn prop_radius_clamped_to_viewport(width in 0.5f32..4000.0, height in 0.5f32..4000.0) {
            let layout = Layout::fit(width, height, &config());
            prop_assert!(layout.radius_big <= width.min(height) * 0.5);

            let landscape = width > height;
            let expected = match (landscape, layout.full_turn) {
                (true, true) | (false, false) => Vec2::X,
                (true, false) | (false, true) => Vec2::Y,
            };
            prop_assert_eq!(layout.spawn_direction, expected);
        }

        #[test]
        fn prop_spawn_point_lies_in_river(width in 0.5f32..4000.0, height in 0.5f32..4000.0) {
            let layout = Layout::fit(width, height, &config());
            let spawn = layout.spawn_point;
            prop_assert!(layout.river.contains(spawn.x, spawn.y));
            // On or past the viewport edge
            let outside = spawn.x <= 0.0 || spawn.y <= 0.0 || spawn.x >= width || spawn.y >= height;
            prop_assert!(outside, "spawn {:?} inside {}x{}", spawn, width, height);
        }
    }
}
