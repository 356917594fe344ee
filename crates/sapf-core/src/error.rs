use std::fmt;

use crate::Coord;

/// The grid field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Size,
    Obstacle,
    Start,
    Goal,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Size => "size",
            Self::Obstacle => "obstacle",
            Self::Start => "start",
            Self::Goal => "goal",
        })
    }
}

/// A [`Grid`](crate::Grid) invariant was violated at construction time.
///
/// Never corrected silently: every constructor and edit surfaces it to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapValidationError {
    #[error("width and height must be positive, got {width}x{height}")]
    NonPositiveSize { width: i32, height: i32 },
    #[error("{field} out of bounds: {coord} not in [0,{width})x[0,{height})")]
    OutOfBounds {
        field: Field,
        coord: Coord,
        width: i32,
        height: i32,
    },
    #[error("{field} cannot be on an obstacle at {coord}")]
    OnObstacle { field: Field, coord: Coord },
    #[error("start and goal cannot be the same cell {0}")]
    StartEqualsGoal(Coord),
    #[error("invalid layout: {0}")]
    Layout(String),
}

impl MapValidationError {
    /// The offending field.
    pub fn field(&self) -> Field {
        match self {
            Self::NonPositiveSize { .. } => Field::Size,
            Self::OutOfBounds { field, .. } | Self::OnObstacle { field, .. } => *field,
            Self::StartEqualsGoal(_) => Field::Goal,
            Self::Layout(_) => Field::Size,
        }
    }
}
