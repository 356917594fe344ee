//! Path reconstruction from child→parent links.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::BuildHasher;

use sapf_core::{Coord, Grid};

use crate::error::SearchError;

/// A child→parent mapping.
pub trait CameFrom {
    /// Parent of `c`, or `None` if `c` is a root (the start).
    fn parent(&self, c: Coord) -> Option<Coord>;
}

impl<S: BuildHasher> CameFrom for HashMap<Coord, Coord, S> {
    fn parent(&self, c: Coord) -> Option<Coord> {
        self.get(&c).copied()
    }
}

impl CameFrom for BTreeMap<Coord, Coord> {
    fn parent(&self, c: Coord) -> Option<Coord> {
        self.get(&c).copied()
    }
}

/// Flat per-cell parent links over a grid's row-major layout.
#[derive(Debug, Clone)]
pub struct ParentMap<'g> {
    grid: &'g Grid,
    parents: Vec<Option<Coord>>,
}

impl<'g> ParentMap<'g> {
    /// An empty mapping sized for `grid`.
    pub fn new(grid: &'g Grid) -> Self {
        Self {
            grid,
            parents: vec![None; grid.len()],
        }
    }

    /// Record `parent` as the parent of `child`. Out-of-bounds children are
    /// ignored.
    #[inline]
    pub fn set(&mut self, child: Coord, parent: Coord) {
        if let Some(i) = self.grid.idx(child) {
            self.parents[i] = Some(parent);
        }
    }

    /// Whether `c` has a recorded parent.
    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        self.parent(c).is_some()
    }
}

impl CameFrom for ParentMap<'_> {
    #[inline]
    fn parent(&self, c: Coord) -> Option<Coord> {
        self.grid.idx(c).and_then(|i| self.parents[i])
    }
}

/// Walk parents back from `terminal` to a root, returning the chain in
/// root-to-terminal order.
///
/// Fails with [`SearchError::CycleDetected`] if a cell is revisited.
pub fn reconstruct_path(came_from: &impl CameFrom, terminal: Coord) -> Result<Vec<Coord>, SearchError> {
    let mut path = vec![terminal];
    let mut seen = HashSet::from([terminal]);
    let mut current = terminal;

    while let Some(parent) = came_from.parent(current) {
        if !seen.insert(parent) {
            return Err(SearchError::CycleDetected { at: parent });
        }
        path.push(parent);
        current = parent;
    }

    path.reverse();
    Ok(path)
}

/// Reconstruct a `start`→`goal` path, or `None` if the chain ending at
/// `goal` does not lead back to `start`.
pub fn reconstruct_path_if_reachable(
    came_from: &impl CameFrom,
    start: Coord,
    goal: Coord,
) -> Result<Option<Vec<Coord>>, SearchError> {
    if start == goal {
        return Ok(Some(vec![start]));
    }
    if came_from.parent(goal).is_none() {
        return Ok(None);
    }
    let path = reconstruct_path(came_from, goal)?;
    Ok((path.first() == Some(&start)).then_some(path))
}
