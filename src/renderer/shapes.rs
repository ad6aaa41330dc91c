//! Shape generation for flares and fish sprites

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::{FishVertex, FlareVertex};
use crate::consts::MAX_FLARE_PRECISION;
use crate::error::PondError;
use crate::pattern::AtlasRegion;

/// Unit flare fan: a hub vertex plus `precision + 1` rim vertices
///
/// The rim closes on itself, so the last rim vertex repeats the first.
/// Indices describe `precision` triangles around the hub. Fans whose last
/// rim index does not fit in `u16` are rejected.
pub fn flare_fan(precision: u32) -> Result<(Vec<FlareVertex>, Vec<u16>), PondError> {
    let out_of_range = || PondError::RangeViolation {
        field: "wave.flare_precision",
        value: precision as f32,
        min: 3.0,
        max: MAX_FLARE_PRECISION as f32,
    };
    if !(3..=MAX_FLARE_PRECISION).contains(&precision) {
        return Err(out_of_range());
    }
    let rim = u16::try_from(precision).map_err(|_| out_of_range())?;

    let mut vertices = Vec::with_capacity(precision as usize + 2);
    vertices.push(FlareVertex::new(0.0, 0.0, 1.0));

    for i in 0..=precision {
        let theta = TAU * i as f32 / precision as f32;
        vertices.push(FlareVertex::new(theta.cos(), theta.sin(), 0.0));
    }

    let mut indices = Vec::with_capacity(precision as usize * 3);
    for i in 1..=rim {
        indices.extend_from_slice(&[0, i, i + 1]);
    }

    Ok((vertices, indices))
}

/// Two triangles covering a fish body, aligned with its heading
pub fn fish_quad(
    center: Vec2,
    direction: Vec2,
    length: f32,
    width: f32,
    region: &AtlasRegion,
) -> [FishVertex; 6] {
    let forward = direction.normalize_or_zero() * (length * 0.5);
    let side = forward.perp().normalize_or_zero() * (width * 0.5);

    // Atlas u runs tail to head, v across the body
    let tail_left = center - forward - side;
    let tail_right = center - forward + side;
    let head_left = center + forward - side;
    let head_right = center + forward + side;

    let (u0, v0) = (region.uv_min.x, region.uv_min.y);
    let (u1, v1) = (region.uv_max.x, region.uv_max.y);

    [
        FishVertex::new(tail_left.x, tail_left.y, u0, v0),
        FishVertex::new(head_left.x, head_left.y, u1, v0),
        FishVertex::new(tail_right.x, tail_right.y, u0, v1),
        FishVertex::new(tail_right.x, tail_right.y, u0, v1),
        FishVertex::new(head_left.x, head_left.y, u1, v0),
        FishVertex::new(head_right.x, head_right.y, u1, v1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flare_fan_layout() {
        let (vertices, indices) = flare_fan(16).unwrap();
        assert_eq!(vertices.len(), 18);
        assert_eq!(indices.len(), 48);
        assert_eq!(vertices[0].intensity, 1.0);
        assert!(vertices[1..].iter().all(|vertex| vertex.intensity == 0.0));
        assert_eq!(&indices[45..], &[0, 16, 17]);

        let first = Vec2::from(vertices[1].offset);
        let last = Vec2::from(vertices[17].offset);
        assert!(first.distance(last) < 1e-5);
    }

    #[test]
    fn test_flare_fan_covers_full_circle_or_fails() {
        let (vertices, indices) = flare_fan(MAX_FLARE_PRECISION).unwrap();
        assert_eq!(vertices.len(), MAX_FLARE_PRECISION as usize + 2);
        assert_eq!(indices.len(), MAX_FLARE_PRECISION as usize * 3);
        assert_eq!(*indices.last().unwrap() as usize, vertices.len() - 1);

        assert!(matches!(
            flare_fan(70_000),
            Err(PondError::RangeViolation {
                field: "wave.flare_precision",
                ..
            })
        ));
        assert!(flare_fan(2).is_err());
    }

    #[test]
    fn test_fish_quad_follows_heading() {
        let region = AtlasRegion {
            slot: 0,
            uv_min: Vec2::ZERO,
            uv_max: Vec2::splat(0.5),
        };
        let quad = fish_quad(Vec2::new(2.0, 1.0), Vec2::Y, 1.0, 0.4, &region);

        // Head vertices sit half a length ahead along +y
        assert!((quad[1].position[1] - 1.5).abs() < 1e-6);
        assert!((quad[5].position[1] - 1.5).abs() < 1e-6);
        assert!((quad[0].position[1] - 0.5).abs() < 1e-6);
        assert_eq!(quad[5].uv, [0.5, 0.5]);

        let centroid = quad.iter().fold(Vec2::ZERO, |sum, v| sum + Vec2::from(v.position)) / 6.0;
        assert!(centroid.distance(Vec2::new(2.0, 1.0)) < 0.3);
    }
}
