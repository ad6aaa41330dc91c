//! Per-frame fish sprite batch

use super::shapes::fish_quad;
use super::vertex::FishVertex;
use crate::consts::{FISH_ASPECT, FISH_LENGTH};
use crate::sim::Fish;

/// Fish quads collected for one frame, in draw order
#[derive(Debug, Default)]
pub struct FishBatch {
    vertices: Vec<FishVertex>,
    skipped: usize,
}

impl FishBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a fish at its position interpolated by `time`
    ///
    /// Fish whose pattern has no atlas slot yet are left out.
    pub fn push_fish(&mut self, fish: &Fish, time: f32) {
        let Some(region) = fish.atlas_region.as_ref() else {
            self.skipped += 1;
            return;
        };

        self.vertices.extend_from_slice(&fish_quad(
            fish.interpolated_position(time),
            fish.direction,
            FISH_LENGTH,
            FISH_LENGTH * FISH_ASPECT,
            region,
        ));
    }

    pub fn vertices(&self) -> &[FishVertex] {
        &self.vertices
    }

    /// Number of fish queued
    pub fn len(&self) -> usize {
        self.vertices.len() / 6
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Fish left out this frame for lack of an atlas slot
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.skipped = 0;
    }
}
