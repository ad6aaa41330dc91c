//! Fish body patterns
//!
//! Procedural body shapes, their binary form, and the atlas they are
//! rendered into.

pub mod atlas;
pub mod bin_buffer;
pub mod layer_shape_body;

pub use atlas::{AtlasRegion, PatternAtlas};
pub use bin_buffer::BinBuffer;
pub use layer_shape_body::LayerShapeBody;
