//! Shared fixtures and snapshot invariant checks for algorithm tests.

use std::collections::HashSet;

use sapf_core::{Coord, Grid};

use crate::step::{SearchStatus, SearchStep};
use crate::traits::PathFinder;

pub(crate) fn fixture(layout: &str) -> Grid {
    Grid::from_ascii(layout).expect("valid fixture layout")
}

pub(crate) fn collect_steps(algo: &impl PathFinder, grid: &Grid) -> Vec<SearchStep> {
    algo.steps(grid)
        .expect("grid has start and goal")
        .collect::<Result<Vec<_>, _>>()
        .expect("search never errors")
}

/// Properties every snapshot sequence must satisfy.
pub(crate) fn assert_step_invariants(steps: &[SearchStep]) {
    assert!(!steps.is_empty());

    for (i, s) in steps.iter().enumerate() {
        let open: HashSet<_> = s.open_set.iter().collect();
        let closed: HashSet<_> = s.closed_set.iter().collect();
        assert_eq!(open.len(), s.open_set.len(), "duplicate in open_set at step {i}");
        assert_eq!(closed.len(), s.closed_set.len(), "duplicate in closed_set at step {i}");
        assert!(
            open.contains(&s.current) || closed.contains(&s.current),
            "current {} outside open/closed at step {i}",
            s.current
        );
        assert!(!s.log.is_empty());
        let last = i + 1 == steps.len();
        assert_eq!(s.status.is_terminal(), last, "terminal status only on the last step");
    }
}

/// `closed_set` only ever grows.
pub(crate) fn assert_closed_monotonic(steps: &[SearchStep]) {
    for pair in steps.windows(2) {
        let prev: HashSet<_> = pair[0].closed_set.iter().collect();
        let next: HashSet<_> = pair[1].closed_set.iter().collect();
        assert!(pair[0].closed_set.len() <= pair[1].closed_set.len());
        assert!(prev.is_subset(&next));
    }
}

/// A walkable start-to-goal path of unit moves over free cells.
pub(crate) fn assert_valid_path(grid: &Grid, path: &[Coord]) {
    assert_eq!(path.first().copied(), grid.start());
    assert_eq!(path.last().copied(), grid.goal());
    for c in path {
        assert!(grid.is_free(*c), "{c} is not free");
    }
    for pair in path.windows(2) {
        assert!(pair[0].is_adjacent(pair[1]), "{} -> {} is not a unit move", pair[0], pair[1]);
    }
}

pub(crate) fn final_status(steps: &[SearchStep]) -> Option<SearchStatus> {
    steps.last().map(|s| s.status)
}

/// Layouts shared by the cross-algorithm tests.
pub(crate) const LAYOUTS: &[&str] = &[
    "S.\n.G",
    "S.G",
    "S#G",
    "\
    S....\n\
    .###.\n\
    ...#G",
    "\
    S.#....\n\
    .##.##.\n\
    ....#..\n\
    .##...#\n\
    ...#.#G",
    "\
    S..#...\n\
    ##.#.#.\n\
    ...#.#.\n\
    .###.#.\n\
    .....#G",
    "\
    S....\n\
    .....\n\
    ..###\n\
    ..#G.\n\
    ..#..",
];
