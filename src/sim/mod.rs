//! Deterministic simulation module
//!
//! Pond geometry and fish behaviour. Everything here is pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order within each pond)
//! - No GPU or platform dependencies

pub mod arc;
pub mod constellation;
pub mod constraint;
pub mod fish;
pub mod pond;
pub mod tick;

pub use arc::ArcSegment;
pub use constellation::{Constellation, Layout, big_pond_radius};
pub use constraint::{Constraint, ConstraintArcPath, ConstraintCircle};
pub use fish::Fish;
pub use pond::Pond;
pub use tick::FrameClock;
