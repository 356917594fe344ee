//! Deterministic layouts that need no randomness.

use sapf_core::{Coord, Grid};

use crate::error::GenError;

/// A grid with no obstacles.
pub fn empty_grid(
    width: i32,
    height: i32,
    start: Option<Coord>,
    goal: Option<Coord>,
) -> Result<Grid, GenError> {
    Ok(Grid::new(width, height, [], start, goal)?)
}

/// A lattice of single-cell pillars on every odd-odd cell.
///
/// Not a maze in the strict sense: every free cell stays reachable. Pillars
/// under `start` or `goal` are left out.
pub fn checker_maze(
    width: i32,
    height: i32,
    start: Option<Coord>,
    goal: Option<Coord>,
) -> Result<Grid, GenError> {
    let pillars = (0..height)
        .flat_map(|y| (0..width).map(move |x| Coord::new(x, y)))
        .filter(|c| c.x % 2 == 1 && c.y % 2 == 1)
        .filter(|&c| Some(c) != start && Some(c) != goal);
    Ok(Grid::new(width, height, pillars, start, goal)?)
}
