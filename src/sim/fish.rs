//! A single fish swimming inside a pond region

use glam::Vec2;
use rand::Rng;

use super::constraint::Constraint;
use crate::consts::*;
use crate::pattern::{AtlasRegion, LayerShapeBody};

/// How strongly a wall bends the heading back toward the water
const WALL_STEER: f32 = 0.5;
/// Largest change in turn rate per tick
const TURN_JITTER: f32 = 0.02;

#[derive(Debug, Clone)]
pub struct Fish {
    pub id: u32,
    pub position: Vec2,
    /// Position at the previous tick, for render interpolation
    position_previous: Vec2,
    /// Unit heading
    pub direction: Vec2,
    /// Scene units per tick
    pub speed: f32,
    /// Current turn rate (radians per tick)
    turn: f32,
    pub body: LayerShapeBody,
    /// Where this fish's pattern lives in the atlas, once written
    pub atlas_region: Option<AtlasRegion>,
}

impl Fish {
    pub fn new(id: u32, position: Vec2, direction: Vec2, speed: f32, body: LayerShapeBody) -> Self {
        Self {
            id,
            position,
            position_previous: position,
            direction: direction.normalize_or_zero(),
            speed,
            turn: 0.0,
            body,
            atlas_region: None,
        }
    }

    /// A fish with a random body and speed
    pub fn random<R: Rng + ?Sized>(id: u32, position: Vec2, direction: Vec2, random: &mut R) -> Self {
        let speed = random.random_range(FISH_SPEED_MIN..=FISH_SPEED_MAX);
        Self::new(id, position, direction, speed, LayerShapeBody::random(random))
    }

    /// Position blended between the last two ticks
    #[inline]
    pub fn interpolated_position(&self, time: f32) -> Vec2 {
        self.position_previous.lerp(self.position, time)
    }

    /// Whether a pick at (x, y) hits this fish
    pub fn hits(&self, x: f32, y: f32) -> bool {
        self.position.distance(Vec2::new(x, y)) <= FISH_PICK_RADIUS
    }

    /// Place the fish at a new position without interpolating toward it
    pub fn drop(&mut self, position: Vec2) {
        self.position = position;
        self.position_previous = position;
        self.turn = 0.0;
    }

    /// Swim one tick inside `constraint`
    pub fn update<R: Rng + ?Sized>(&mut self, constraint: &Constraint, random: &mut R) {
        self.position_previous = self.position;

        self.turn = (self.turn + random.random_range(-TURN_JITTER..=TURN_JITTER))
            .clamp(-FISH_TURN_MAX, FISH_TURN_MAX);
        let turned = Vec2::from_angle(self.turn).rotate(self.direction).normalize_or_zero();
        if turned != Vec2::ZERO {
            self.direction = turned;
        }

        let wanted = self.position + self.direction * self.speed;
        let mut next = wanted;

        if constraint.constrain(&mut next) {
            // Slide along the wall and bend back toward open water
            let inward = (next - wanted).normalize_or_zero();
            let along = (next - self.position).normalize_or_zero();
            let heading = (along + inward * WALL_STEER).normalize_or_zero();

            self.direction = if heading == Vec2::ZERO {
                -self.direction
            } else {
                heading
            };
            self.turn = 0.0;
        } else if !constraint.contains(next.x, next.y) {
            // Swam out of an open corridor end; turn back
            next = self.position;
            self.direction = -self.direction;
            self.turn = 0.0;
        }

        self.position = next;
    }
}
