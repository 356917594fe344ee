//! Seeded random layouts.
//!
//! All randomness flows through the caller-supplied RNG held by [`MapGen`],
//! so a seeded RNG reproduces the same grid.

use rand::seq::SliceRandom;
use rand::Rng;
use sapf_core::{Coord, Grid};
use sapf_paths::{Bfs, PathFinder};

use crate::error::GenError;

/// Grid generator driven by `rng`.
pub struct MapGen<R: Rng> {
    pub rng: R,
}

impl<R: Rng> MapGen<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Scatter `round(n·ratio)` obstacles uniformly over the `n` cells that
    /// are neither `start` nor `goal`.
    pub fn random_obstacles(
        &mut self,
        width: i32,
        height: i32,
        ratio: f64,
        start: Option<Coord>,
        goal: Option<Coord>,
    ) -> Result<Grid, GenError> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(GenError::invalid(format!(
                "obstacle ratio must be in [0, 1], got {ratio}"
            )));
        }
        if width <= 0 || height <= 0 {
            return Ok(Grid::new(width, height, [], start, goal)?);
        }

        let mut cells: Vec<Coord> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Coord::new(x, y)))
            .filter(|&c| Some(c) != start && Some(c) != goal)
            .collect();
        cells.shuffle(&mut self.rng);
        let count = (cells.len() as f64 * ratio).round() as usize;
        cells.truncate(count);

        Ok(Grid::new(width, height, cells, start, goal)?)
    }

    /// Like [`random_obstacles`](Self::random_obstacles), but retries until
    /// BFS finds a start-to-goal path.
    ///
    /// Fails with [`GenError::InvalidParameter`] once `attempts` layouts in a
    /// row were unsolvable.
    pub fn solvable_random_obstacles(
        &mut self,
        width: i32,
        height: i32,
        ratio: f64,
        start: Coord,
        goal: Coord,
        attempts: usize,
    ) -> Result<Grid, GenError> {
        for attempt in 1..=attempts {
            let grid = self.random_obstacles(width, height, ratio, Some(start), Some(goal))?;
            if !Bfs.find_path(&grid)?.is_empty() {
                log::debug!("solvable layout after {attempt} attempt(s)");
                return Ok(grid);
            }
        }
        Err(GenError::invalid(format!(
            "no solvable layout at ratio {ratio} after {attempts} attempts"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn mapgen(seed: u64) -> MapGen<StdRng> {
        MapGen::with_rng(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn obstacle_count_follows_ratio() {
        let start = Coord::new(0, 0);
        let goal = Coord::new(9, 9);
        let grid = mapgen(1)
            .random_obstacles(10, 10, 0.25, Some(start), Some(goal))
            .unwrap();
        // 98 eligible cells, round(24.5) rounds away from zero.
        assert_eq!(grid.obstacle_count(), 25);
        assert!(grid.is_free(start));
        assert!(grid.is_free(goal));
    }

    #[test]
    fn same_seed_same_layout() {
        let a = mapgen(9).random_obstacles(12, 8, 0.3, None, None).unwrap();
        let b = mapgen(9).random_obstacles(12, 8, 0.3, None, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ratio_bounds() {
        let mut mg = mapgen(0);
        assert!(matches!(
            mg.random_obstacles(4, 4, 1.5, None, None),
            Err(GenError::InvalidParameter(_))
        ));
        assert!(matches!(
            mg.random_obstacles(4, 4, f64::NAN, None, None),
            Err(GenError::InvalidParameter(_))
        ));
        let full = mg
            .random_obstacles(3, 3, 1.0, Some(Coord::new(0, 0)), Some(Coord::new(2, 2)))
            .unwrap();
        assert_eq!(full.free_count(), 2);
        let none = mg.random_obstacles(3, 3, 0.0, None, None).unwrap();
        assert_eq!(none.obstacle_count(), 0);
    }

    #[test]
    fn solvable_layouts_have_a_path() {
        let start = Coord::new(0, 0);
        let goal = Coord::new(14, 9);
        let grid = mapgen(5)
            .solvable_random_obstacles(15, 10, 0.3, start, goal, 200)
            .unwrap();
        assert!(!Bfs.find_path(&grid).unwrap().is_empty());
    }

    #[test]
    fn hopeless_ratio_gives_up() {
        let r = mapgen(5).solvable_random_obstacles(6, 6, 1.0, Coord::new(0, 0), Coord::new(5, 5), 3);
        assert!(matches!(r, Err(GenError::InvalidParameter(_))));
    }
}
