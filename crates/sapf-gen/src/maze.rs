//! Perfect mazes by recursive backtracking.

use rand::{Rng, RngExt};
use sapf_core::{Coord, Grid};

use crate::error::GenError;
use crate::mapgen::MapGen;

/// Parameters of a perfect maze.
///
/// The maze is carved over a `cell_width × cell_height` lattice of logical
/// cells and scaled to a `(2·cell_width + 1) × (2·cell_height + 1)` grid:
/// logical cells sit on odd coordinates, walls on even ones.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MazeSpec {
    pub cell_width: i32,
    pub cell_height: i32,
    /// Defaults to the top-left corridor cell `(1, 1)`.
    pub start: Option<Coord>,
    /// Defaults to the bottom-right corridor cell.
    pub goal: Option<Coord>,
}

impl MazeSpec {
    pub fn new(cell_width: i32, cell_height: i32) -> Self {
        Self {
            cell_width,
            cell_height,
            start: None,
            goal: None,
        }
    }

    /// Size of the scaled grid.
    pub fn grid_size(&self) -> (i32, i32) {
        (2 * self.cell_width + 1, 2 * self.cell_height + 1)
    }
}

impl<R: Rng> MapGen<R> {
    /// Carve a perfect maze: every pair of free cells is joined by exactly
    /// one path.
    pub fn perfect_maze(&mut self, spec: &MazeSpec) -> Result<Grid, GenError> {
        if spec.cell_width < 1 || spec.cell_height < 1 {
            return Err(GenError::invalid(format!(
                "maze needs at least one cell, got {}x{}",
                spec.cell_width, spec.cell_height
            )));
        }
        let (cw, ch) = (spec.cell_width, spec.cell_height);
        let scaled_len = cw
            .checked_mul(2)
            .and_then(|w| w.checked_add(1))
            .zip(ch.checked_mul(2).and_then(|h| h.checked_add(1)))
            .and_then(|(w, h)| w.checked_mul(h));
        if scaled_len.is_none() {
            return Err(GenError::invalid(format!(
                "maze of {cw}x{ch} cells is too large for a grid"
            )));
        }
        let (width, height) = spec.grid_size();
        let mut open = vec![false; width as usize * height as usize];
        let at = |c: Coord| (c.y * width + c.x) as usize;
        let scaled = |c: Coord| Coord::new(2 * c.x + 1, 2 * c.y + 1);

        let mut visited = vec![false; cw as usize * ch as usize];
        let cell_idx = |c: Coord| (c.y * cw + c.x) as usize;
        let in_maze = |c: Coord| c.x >= 0 && c.y >= 0 && c.x < cw && c.y < ch;

        let origin = Coord::ZERO;
        visited[cell_idx(origin)] = true;
        open[at(scaled(origin))] = true;
        let mut stack = vec![origin];
        let mut options = Vec::with_capacity(4);

        while let Some(&cell) = stack.last() {
            options.clear();
            options.extend(
                cell.neighbors_4()
                    .into_iter()
                    .filter(|&n| in_maze(n) && !visited[cell_idx(n)]),
            );
            if options.is_empty() {
                stack.pop();
                continue;
            }
            let next = options[self.rng.random_range(0..options.len())];
            visited[cell_idx(next)] = true;
            // Knock down the wall between the two cells.
            let wall = scaled(cell) + (next - cell);
            open[at(wall)] = true;
            open[at(scaled(next))] = true;
            stack.push(next);
        }

        let walls = (0..height)
            .flat_map(|y| (0..width).map(move |x| Coord::new(x, y)))
            .filter(|&c| !open[at(c)]);
        let start = spec.start.unwrap_or(Coord::new(1, 1));
        let goal = spec.goal.unwrap_or(Coord::new(2 * cw - 1, 2 * ch - 1));
        Ok(Grid::new(width, height, walls, Some(start), Some(goal))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    fn maze(seed: u64, spec: &MazeSpec) -> Grid {
        MapGen::with_rng(StdRng::seed_from_u64(seed))
            .perfect_maze(spec)
            .unwrap()
    }

    fn reachable(grid: &Grid, from: Coord) -> usize {
        let mut seen = vec![false; grid.len()];
        let mut queue = VecDeque::from([from]);
        seen[grid.idx(from).unwrap()] = true;
        let mut count = 0;
        while let Some(c) = queue.pop_front() {
            count += 1;
            for n in c.neighbors_4() {
                if let Some(i) = grid.idx(n).filter(|_| grid.is_free(n)) {
                    if !seen[i] {
                        seen[i] = true;
                        queue.push_back(n);
                    }
                }
            }
        }
        count
    }

    #[test]
    fn maze_is_a_spanning_tree() {
        let spec = MazeSpec::new(6, 4);
        let grid = maze(3, &spec);
        assert_eq!((grid.width(), grid.height()), (13, 9));

        // cells + connecting passages
        let free = grid.free_count();
        assert_eq!(free, 2 * 6 * 4 - 1);
        assert_eq!(reachable(&grid, Coord::new(1, 1)), free);

        let edges = grid
            .free_cells()
            .flat_map(|c| [c.shift(1, 0), c.shift(0, 1)])
            .filter(|&n| grid.is_free(n))
            .count();
        assert_eq!(edges, free - 1);
    }

    #[test]
    fn border_is_walled_and_endpoints_default_to_corners() {
        let grid = maze(8, &MazeSpec::new(3, 3));
        for x in 0..grid.width() {
            assert!(grid.is_blocked(Coord::new(x, 0)));
            assert!(grid.is_blocked(Coord::new(x, grid.height() - 1)));
        }
        assert_eq!(grid.start(), Some(Coord::new(1, 1)));
        assert_eq!(grid.goal(), Some(Coord::new(5, 5)));
    }

    #[test]
    fn seeded_mazes_repeat() {
        let spec = MazeSpec::new(5, 5);
        assert_eq!(maze(21, &spec), maze(21, &spec));
    }

    #[test]
    fn rejects_degenerate_sizes() {
        let mut mg = MapGen::with_rng(StdRng::seed_from_u64(0));
        assert!(matches!(
            mg.perfect_maze(&MazeSpec::new(0, 3)),
            Err(GenError::InvalidParameter(_))
        ));
        // A single cell has nowhere to put a distinct goal.
        assert!(matches!(mg.perfect_maze(&MazeSpec::new(1, 1)), Err(GenError::Map(_))));
    }

    #[test]
    fn rejects_sizes_past_the_grid_range() {
        let mut mg = MapGen::with_rng(StdRng::seed_from_u64(0));
        assert!(matches!(
            mg.perfect_maze(&MazeSpec::new(30_000, 30_000)),
            Err(GenError::InvalidParameter(_))
        ));
        assert!(matches!(
            mg.perfect_maze(&MazeSpec::new(i32::MAX, 2)),
            Err(GenError::InvalidParameter(_))
        ));
    }

    #[test]
    fn custom_endpoints_must_be_corridors() {
        let spec = MazeSpec {
            start: Some(Coord::new(0, 0)),
            ..MazeSpec::new(3, 3)
        };
        let mut mg = MapGen::with_rng(StdRng::seed_from_u64(0));
        assert!(matches!(mg.perfect_maze(&spec), Err(GenError::Map(_))));
    }
}
