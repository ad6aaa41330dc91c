//! Water surface simulation
//!
//! A [`WaterPlane`] owns two height buffers and the flares waiting to be
//! stamped into them. A [`WaveSimulator`] knows how to allocate those
//! buffers and advance them one step; the GPU driver lives in
//! `renderer::waves`, the CPU stepper here.

pub mod height_field;
pub mod plane;

pub use height_field::{CpuWaves, HeightField};
pub use plane::{Flare, WaterPlane, simulation_size};

/// Something that can advance a water plane
pub trait WaveSimulator {
    type Buffer;

    /// Allocate one zeroed height buffer of `width` by `height` texels
    fn create_buffer(&self, width: u32, height: u32) -> Self::Buffer;

    /// Flip the plane, propagate one step into the new front buffer, then
    /// stamp and drain the queued flares
    fn propagate(&mut self, plane: &mut WaterPlane<Self::Buffer>);
}
