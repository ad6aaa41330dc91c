//! Double-buffered water surface and its pending disturbances

use crate::error::PondError;

use super::WaveSimulator;

/// A circular disturbance in simulation texels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flare {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Height field pair plus the flares queued for the next step
///
/// The front buffer holds the newest state. Each propagation flips the pair,
/// reads the back buffer and writes the front one.
pub struct WaterPlane<B> {
    width: u32,
    height: u32,
    /// Simulation texels per scene unit
    resolution: f32,
    buffers: [B; 2],
    front: usize,
    flares: Vec<Flare>,
}

/// Simulation texel count along one axis for a scene extent
pub fn simulation_size(extent: f32, resolution: f32) -> u32 {
    ((extent * resolution).ceil() as u32).max(1)
}

impl<B> WaterPlane<B> {
    /// A plane covering `width` by `height` scene units
    pub fn new<S>(
        simulator: &S,
        width: f32,
        height: f32,
        resolution: f32,
    ) -> Result<Self, PondError>
    where
        S: WaveSimulator<Buffer = B> + ?Sized,
    {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(PondError::InvalidViewport { width, height });
        }
        PondError::check_range("resolution", resolution, f32::MIN_POSITIVE, f32::MAX)?;

        let columns = simulation_size(width, resolution);
        let rows = simulation_size(height, resolution);
        log::debug!("Water plane {}x{} texels ({} per unit)", columns, rows, resolution);

        Ok(Self {
            width: columns,
            height: rows,
            resolution,
            buffers: [
                simulator.create_buffer(columns, rows),
                simulator.create_buffer(columns, rows),
            ],
            front: 0,
            flares: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Index of the front buffer
    pub fn front_index(&self) -> usize {
        self.front
    }

    pub fn flip(&mut self) {
        self.front = 1 - self.front;
    }

    pub fn front(&self) -> &B {
        &self.buffers[self.front]
    }

    pub fn back(&self) -> &B {
        &self.buffers[1 - self.front]
    }

    pub fn front_mut(&mut self) -> &mut B {
        &mut self.buffers[self.front]
    }

    /// Back buffer to read from and front buffer to write to
    pub fn back_and_front_mut(&mut self) -> (&B, &mut B) {
        let [first, second] = &mut self.buffers;
        if self.front == 0 {
            (second, first)
        } else {
            (first, second)
        }
    }

    /// Queue a disturbance at scene position (x, y)
    pub fn add_flare(&mut self, x: f32, y: f32, radius: f32) -> Result<(), PondError> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(PondError::DegenerateFlare { radius });
        }

        self.flares.push(Flare {
            x: x * self.resolution,
            y: y * self.resolution,
            radius: radius * self.resolution,
        });
        Ok(())
    }

    pub fn pending_flares(&self) -> &[Flare] {
        &self.flares
    }

    /// Drain the flare queue
    pub fn take_flares(&mut self) -> Vec<Flare> {
        std::mem::take(&mut self.flares)
    }
}
