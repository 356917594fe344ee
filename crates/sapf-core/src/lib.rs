//! **sapf-core**: grid world value types for single-agent pathfinding.
//!
//! This crate provides the environment every search runs on: the
//! [`Coord`] cell position, the immutable, validated [`Grid`], and its
//! plain structural form [`CanonicalGrid`] used by persistence
//! collaborators.

pub mod coord;
pub mod error;
pub mod grid;

pub use coord::Coord;
pub use error::{Field, MapValidationError};
pub use grid::{CanonicalGrid, Grid};
