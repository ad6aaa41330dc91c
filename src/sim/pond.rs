//! A pond: one constraint region and the fish living in it

use rand::Rng;

use super::constraint::Constraint;
use super::fish::Fish;
use crate::pattern::PatternAtlas;
use crate::renderer::FishBatch;

#[derive(Debug, Clone)]
pub struct Pond {
    constraint: Constraint,
    /// Fish in insertion order; later fish render on top
    fishes: Vec<Fish>,
}

impl Pond {
    pub fn new(constraint: impl Into<Constraint>) -> Self {
        Self {
            constraint: constraint.into(),
            fishes: Vec::new(),
        }
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    pub fn fishes(&self) -> &[Fish] {
        &self.fishes
    }

    pub fn len(&self) -> usize {
        self.fishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fishes.is_empty()
    }

    pub fn add_fish(&mut self, fish: Fish) {
        self.fishes.push(fish);
    }

    /// Remove and return the topmost fish under (x, y)
    pub fn pick(&mut self, x: f32, y: f32) -> Option<Fish> {
        let index = self.fishes.iter().rposition(|fish| fish.hits(x, y))?;
        Some(self.fishes.remove(index))
    }

    /// Swap in a new region and carry every fish over to it
    ///
    /// Fish the new region cannot place are removed and returned so the
    /// caller can drop them somewhere else. Atlas regions are left as they
    /// are; the caller rewrites the atlas once all ponds are rebound.
    pub fn replace_constraint(&mut self, constraint: Constraint) -> Vec<Fish> {
        let previous = std::mem::replace(&mut self.constraint, constraint);
        let mut displaced = Vec::new();

        for mut fish in std::mem::take(&mut self.fishes) {
            match self.constraint.transfer(&previous, fish.position) {
                Some(position) => {
                    fish.drop(position);
                    self.fishes.push(fish);
                }
                None => displaced.push(fish),
            }
        }

        displaced
    }

    /// Advance every fish by one tick, writing patterns of new fish first
    pub fn update<R: Rng + ?Sized>(&mut self, atlas: &mut PatternAtlas, random: &mut R) {
        for fish in &mut self.fishes {
            if fish.atlas_region.is_none() {
                fish.atlas_region = atlas.write(&fish.body);
            }
            fish.update(&self.constraint, random);
        }
    }

    /// Write every fish pattern to the atlas again
    pub fn update_atlas(&mut self, atlas: &mut PatternAtlas) {
        for fish in &mut self.fishes {
            fish.atlas_region = atlas.write(&fish.body);
        }
    }

    pub fn render(&self, primitives: &mut FishBatch, time: f32) {
        for fish in &self.fishes {
            primitives.push_fish(fish, time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::LayerShapeBody;
    use crate::sim::arc::ArcSegment;
    use crate::sim::constraint::{ConstraintArcPath, ConstraintCircle};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fish_at(id: u32, x: f32, y: f32) -> Fish {
        Fish::new(id, Vec2::new(x, y), Vec2::X, 0.02, LayerShapeBody::new(1.0, 1.0))
    }

    #[test]
    fn test_pick_removes_topmost() {
        let mut pond = Pond::new(ConstraintCircle::new(Vec2::ZERO, 5.0));
        pond.add_fish(fish_at(1, 0.0, 0.0));
        pond.add_fish(fish_at(2, 0.1, 0.0));

        let picked = pond.pick(0.05, 0.0).unwrap();
        assert_eq!(picked.id, 2);
        assert_eq!(pond.len(), 1);
        assert!(pond.pick(3.0, 3.0).is_none());
    }

    #[test]
    fn test_replace_constraint_scales_fish_into_new_circle() {
        let mut pond = Pond::new(ConstraintCircle::new(Vec2::ZERO, 4.0));
        pond.add_fish(fish_at(1, 2.0, 0.0));

        let displaced =
            pond.replace_constraint(ConstraintCircle::new(Vec2::new(10.0, 10.0), 2.0).into());
        assert!(displaced.is_empty());
        assert!((pond.fishes()[0].position - Vec2::new(11.0, 10.0)).length() < 1e-4);
    }

    #[test]
    fn test_replace_constraint_displaces_unplaceable_fish() {
        let path = |start: f32, end: f32| {
            ConstraintArcPath::new(vec![ArcSegment::new(Vec2::ZERO, 10.0, start, end)], 2.0)
        };
        let mut pond = Pond::new(path(0.0, 1.0));
        pond.add_fish(fish_at(1, 10.0, 0.5));

        let displaced = pond.replace_constraint(path(2.0, 3.0).into());
        assert_eq!(displaced.len(), 1);
        assert!(pond.is_empty());
    }

    #[test]
    fn test_update_writes_missing_patterns() {
        let mut pond = Pond::new(ConstraintCircle::new(Vec2::ZERO, 5.0));
        pond.add_fish(fish_at(1, 0.0, 0.0));
        pond.add_fish(fish_at(2, 1.0, 0.0));

        let mut atlas = PatternAtlas::new(8, 4);
        let mut random = Pcg32::seed_from_u64(1);
        pond.update(&mut atlas, &mut random);

        assert_eq!(atlas.len(), 2);
        assert!(pond.fishes().iter().all(|fish| fish.atlas_region.is_some()));

        // Already written fish are not written again
        pond.update(&mut atlas, &mut random);
        assert_eq!(atlas.len(), 2);
    }
}
