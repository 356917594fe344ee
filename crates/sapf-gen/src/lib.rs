//! Grid world generators.
//!
//! - [`presets`]: fixed layouts ([`empty_grid`], [`checker_maze`])
//! - [`MapGen`]: seeded random layouts: uniform obstacles
//!   ([`MapGen::random_obstacles`]), perfect mazes ([`MapGen::perfect_maze`])
//!   and warehouse floor plans ([`MapGen::warehouse`])
//! - [`movingai`]: import of MovingAI benchmark maps and scenarios
//!
//! Randomized generators take their RNG from the caller, so seeding it
//! reproduces the same grid.

mod error;
mod mapgen;
mod maze;
pub mod movingai;
pub mod presets;
mod warehouse;

pub use error::GenError;
pub use mapgen::MapGen;
pub use maze::MazeSpec;
pub use presets::{checker_maze, empty_grid};
pub use warehouse::WarehouseSpec;
