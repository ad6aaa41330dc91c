//! CPU height field and wave stepper
//!
//! Mirrors the GPU passes texel for texel: channel 0 is the current height,
//! channel 1 the height one step earlier.

use glam::Vec2;

use super::WaveSimulator;
use super::plane::{Flare, WaterPlane};
use crate::settings::WaveConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    width: u32,
    height: u32,
    cells: Vec<[f32; 2]>,
}

impl HeightField {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![[0.0; 2]; (width * height) as usize],
        }
    }

    pub fn columns(&self) -> u32 {
        self.width
    }

    pub fn rows(&self) -> u32 {
        self.height
    }

    /// Cell at (x, y), clamped to the edge
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> [f32; 2] {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.cells[y * self.width as usize + x]
    }

    /// Current height at (x, y), clamped to the edge
    #[inline]
    pub fn height(&self, x: i64, y: i64) -> f32 {
        self.get(x, y)[0]
    }

    pub fn set(&mut self, x: u32, y: u32, cell: [f32; 2]) {
        let index = (y * self.width + x) as usize;
        self.cells[index] = cell;
    }

    /// Largest absolute height
    pub fn peak(&self) -> f32 {
        self.cells.iter().fold(0.0, |peak, cell| peak.max(cell[0].abs()))
    }

    /// Blend a flare fan into the field the way alpha blending does on the GPU
    fn apply_flare(&mut self, flare: &Flare) {
        let center = Vec2::new(flare.x, flare.y);
        let min_x = (flare.x - flare.radius).floor().max(0.0) as u32;
        let min_y = (flare.y - flare.radius).floor().max(0.0) as u32;
        let max_x = ((flare.x + flare.radius).ceil() as u32).min(self.width);
        let max_y = ((flare.y + flare.radius).ceil() as u32).min(self.height);

        for y in min_y..max_y {
            for x in min_x..max_x {
                let texel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let distance = texel.distance(center);
                if distance >= flare.radius {
                    continue;
                }

                let intensity = 1.0 - distance / flare.radius;
                let index = (y * self.width + x) as usize;
                let [current, previous] = self.cells[index];
                self.cells[index] = [
                    intensity * intensity + current * (1.0 - intensity),
                    previous * (1.0 - intensity),
                ];
            }
        }
    }
}

/// Headless wave stepper over [`HeightField`] buffers
#[derive(Debug, Clone)]
pub struct CpuWaves {
    damping: f32,
}

impl Default for CpuWaves {
    fn default() -> Self {
        Self::new(&WaveConfig::default())
    }
}

impl CpuWaves {
    pub fn new(config: &WaveConfig) -> Self {
        Self {
            damping: config.damping,
        }
    }
}

impl WaveSimulator for CpuWaves {
    type Buffer = HeightField;

    fn create_buffer(&self, width: u32, height: u32) -> HeightField {
        HeightField::new(width, height)
    }

    fn propagate(&mut self, plane: &mut WaterPlane<HeightField>) {
        plane.flip();

        let (source, target) = plane.back_and_front_mut();
        for y in 0..source.rows() {
            for x in 0..source.columns() {
                let (xi, yi) = (x as i64, y as i64);
                let [current, previous] = source.get(xi, yi);
                let neighbours = source.height(xi - 1, yi)
                    + source.height(xi, yi - 1)
                    + source.height(xi + 1, yi)
                    + source.height(xi, yi + 1);

                target.set(x, y, [(neighbours / 2.0 - previous) * self.damping, current]);
            }
        }

        let flares = plane.take_flares();
        let front = plane.front_mut();
        for flare in &flares {
            front.apply_flare(flare);
        }
    }
}
