//! Shared pieces of the demo binaries: a seeded demo map and an ASCII
//! painter for search snapshots.

use rand::SeedableRng;
use rand::rngs::StdRng;
use sapf_core::{Coord, Grid};
use sapf_gen::{GenError, MapGen};
use sapf_paths::SearchStep;

pub const WIDTH: i32 = 30;
pub const HEIGHT: i32 = 12;
pub const OBSTACLE_RATIO: f64 = 0.25;

// Glyphs, one per layer.
pub const FREE: char = '.';
pub const WALL: char = '#';
pub const START: char = 'S';
pub const GOAL: char = 'G';
pub const CLOSED: char = ',';
pub const OPEN: char = 'o';
pub const PATH: char = '*';
pub const CURRENT: char = '@';

pub const LEGEND: &str = "\
. free   # wall   S start   G goal
, closed o open   * path    @ current";

/// A solvable random map, corner to corner, reproducible from `seed`.
pub fn demo_grid(seed: u64) -> Result<Grid, GenError> {
    MapGen::with_rng(StdRng::seed_from_u64(seed)).solvable_random_obstacles(
        WIDTH,
        HEIGHT,
        OBSTACLE_RATIO,
        Coord::new(0, 0),
        Coord::new(WIDTH - 1, HEIGHT - 1),
        100,
    )
}

/// Paint one snapshot as text, one line per row.
///
/// Layers are drawn in order (base grid, closed set, open set, best path,
/// current cell) so each one overwrites the ones before it.
pub fn paint(grid: &Grid, step: &SearchStep) -> String {
    let w = grid.width() as usize;
    let mut cells: Vec<char> = (0..grid.len())
        .map(|i| {
            let c = grid.coord(i);
            if grid.start() == Some(c) {
                START
            } else if grid.goal() == Some(c) {
                GOAL
            } else if grid.is_blocked(c) {
                WALL
            } else {
                FREE
            }
        })
        .collect();

    let mut layer = |coords: &[Coord], glyph: char| {
        for &c in coords {
            if let Some(i) = grid.idx(c) {
                cells[i] = glyph;
            }
        }
    };
    layer(&step.closed_set, CLOSED);
    layer(&step.open_set, OPEN);
    if let Some(path) = &step.best_path {
        layer(path, PATH);
    }
    layer(&[step.current], CURRENT);

    let mut out = String::with_capacity(cells.len() + cells.len() / w.max(1));
    for row in cells.chunks(w.max(1)) {
        out.extend(row);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapf_paths::{Bfs, PathFinder, SearchStatus};

    #[test]
    fn layers_paint_in_order() {
        let grid = Grid::from_ascii("S..\n.#.\n..G").unwrap();
        let step = SearchStep {
            current: Coord::new(1, 0),
            open_set: vec![Coord::new(2, 0), Coord::new(1, 0)],
            closed_set: vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(1, 0)],
            open_added: Vec::new(),
            best_path: Some(vec![Coord::new(0, 0), Coord::new(1, 0)]),
            log: String::new(),
            status: SearchStatus::Running,
        };
        assert_eq!(paint(&grid, &step), "*@o\n,#.\n..G\n");
    }

    #[test]
    fn final_frame_shows_path() {
        let grid = Grid::from_ascii("S.\n#G").unwrap();
        let last = Bfs.steps(&grid).unwrap().last().unwrap().unwrap();
        assert_eq!(paint(&grid, &last), "**\n#@\n");
    }

    #[test]
    fn demo_grid_is_reproducible() {
        let a = demo_grid(42).unwrap();
        assert_eq!(a, demo_grid(42).unwrap());
        assert!(!Bfs.find_path(&a).unwrap().is_empty());
    }
}
