//! WebGPU rendering module
//!
//! The wave driver runs the water simulation and composites it over the
//! background. Fish are collected into a sprite batch for the host to draw.

pub mod batch;
pub mod shapes;
pub mod vertex;
pub mod waves;

pub use batch::FishBatch;
pub use vertex::{FishVertex, FlareInstance, FlareVertex};
pub use waves::{WATER_FORMAT, WaterTexture, Waves};
