//! Shared texture atlas holding one rendered body pattern per fish
//!
//! The atlas is a square grid of equally sized slots in a single RGBA8
//! image. Slots are handed out in order and reclaimed all at once by
//! `clear`, which is how a full rewrite of every fish pattern starts.

use glam::Vec2;

use super::layer_shape_body::LayerShapeBody;

/// Texture coordinates of one atlas slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasRegion {
    pub slot: u32,
    pub uv_min: Vec2,
    pub uv_max: Vec2,
}

pub struct PatternAtlas {
    /// Slot edge length in pixels
    slot_size: u32,
    /// Slots per row and per column
    slots_per_side: u32,
    pixels: Vec<u8>,
    next_slot: u32,
    dirty: bool,
}

impl PatternAtlas {
    pub fn new(slot_size: u32, slots_per_side: u32) -> Self {
        let side = (slot_size * slots_per_side) as usize;
        Self {
            slot_size,
            slots_per_side,
            pixels: vec![0; side * side * 4],
            next_slot: 0,
            dirty: false,
        }
    }

    /// Atlas edge length in pixels
    pub fn side(&self) -> u32 {
        self.slot_size * self.slots_per_side
    }

    pub fn capacity(&self) -> u32 {
        self.slots_per_side * self.slots_per_side
    }

    /// Number of slots in use
    pub fn len(&self) -> u32 {
        self.next_slot
    }

    pub fn is_empty(&self) -> bool {
        self.next_slot == 0
    }

    /// RGBA8 pixels, row-major, for texture upload
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Whether pixels changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Release every slot
    pub fn clear(&mut self) {
        self.next_slot = 0;
        self.pixels.fill(0);
        self.dirty = true;
    }

    /// Render a body into the next free slot
    pub fn write(&mut self, body: &LayerShapeBody) -> Option<AtlasRegion> {
        if self.next_slot >= self.capacity() {
            log::warn!("Pattern atlas full ({} slots)", self.capacity());
            return None;
        }

        let slot = self.next_slot;
        self.next_slot += 1;

        let origin_x = (slot % self.slots_per_side) * self.slot_size;
        let origin_y = (slot / self.slots_per_side) * self.slot_size;
        let side = self.side() as usize;
        let size = self.slot_size as f32;

        for y in 0..self.slot_size {
            let v = (y as f32 + 0.5) / size;
            for x in 0..self.slot_size {
                let u = (x as f32 + 0.5) / size;
                let index = ((origin_y + y) as usize * side + (origin_x + x) as usize) * 4;
                let rgba = match body.shade(u, v) {
                    Some(shade) => {
                        let level = (shade.clamp(0.0, 1.0) * 255.0).round() as u8;
                        [level, level, level, 255]
                    }
                    None => [0; 4],
                };
                self.pixels[index..index + 4].copy_from_slice(&rgba);
            }
        }

        self.dirty = true;

        let scale = 1.0 / self.slots_per_side as f32;
        let uv_min = Vec2::new(
            (slot % self.slots_per_side) as f32 * scale,
            (slot / self.slots_per_side) as f32 * scale,
        );

        Some(AtlasRegion {
            slot,
            uv_min,
            uv_max: uv_min + Vec2::splat(scale),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_fill_in_order() {
        let mut atlas = PatternAtlas::new(8, 2);
        let body = LayerShapeBody::new(1.0, 1.0);

        let first = atlas.write(&body).unwrap();
        let second = atlas.write(&body).unwrap();
        assert_eq!(first.slot, 0);
        assert_eq!(second.slot, 1);
        assert_eq!(second.uv_min, Vec2::new(0.5, 0.0));
        assert_eq!(second.uv_max, Vec2::new(1.0, 0.5));
        assert_eq!(atlas.len(), 2);
    }

    #[test]
    fn test_full_atlas_refuses() {
        let mut atlas = PatternAtlas::new(4, 1);
        let body = LayerShapeBody::new(1.0, 1.0);
        assert!(atlas.write(&body).is_some());
        assert!(atlas.write(&body).is_none());

        atlas.clear();
        assert!(atlas.is_empty());
        assert!(atlas.write(&body).is_some());
    }

    #[test]
    fn test_body_center_is_opaque() {
        let mut atlas = PatternAtlas::new(16, 1);
        atlas.write(&LayerShapeBody::new(1.0, 1.0)).unwrap();
        assert!(atlas.take_dirty());
        assert!(!atlas.take_dirty());

        // Pixel (8, 8) sits at the middle of the body
        let index = (8 * 16 + 8) * 4;
        assert_eq!(atlas.pixels()[index + 3], 255);
        // Corner lies outside the silhouette
        assert_eq!(atlas.pixels()[3], 0);
    }
}
