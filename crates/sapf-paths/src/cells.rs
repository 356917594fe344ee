//! Flat per-cell state over a grid's row-major layout.
//!
//! Out-of-bounds coordinates read as the default value and writes to them
//! are ignored, so callers never index by hand.

use sapf_core::{Coord, Grid};

/// Per-cell membership flags.
#[derive(Debug, Clone)]
pub(crate) struct CellSet<'g> {
    grid: &'g Grid,
    bits: Vec<bool>,
}

impl<'g> CellSet<'g> {
    pub(crate) fn new(grid: &'g Grid) -> Self {
        Self {
            grid,
            bits: vec![false; grid.len()],
        }
    }

    #[inline]
    pub(crate) fn contains(&self, c: Coord) -> bool {
        self.grid.idx(c).is_some_and(|i| self.bits[i])
    }

    /// Returns `true` if `c` was not already present.
    #[inline]
    pub(crate) fn insert(&mut self, c: Coord) -> bool {
        match self.grid.idx(c) {
            Some(i) if !self.bits[i] => {
                self.bits[i] = true;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub(crate) fn remove(&mut self, c: Coord) {
        if let Some(i) = self.grid.idx(c) {
            self.bits[i] = false;
        }
    }
}

/// Per-cell values with a fill default.
#[derive(Debug, Clone)]
pub(crate) struct CellMap<'g, T> {
    grid: &'g Grid,
    values: Vec<T>,
    fill: T,
}

impl<'g, T: Copy> CellMap<'g, T> {
    pub(crate) fn new(grid: &'g Grid, fill: T) -> Self {
        Self {
            grid,
            values: vec![fill; grid.len()],
            fill,
        }
    }

    #[inline]
    pub(crate) fn get(&self, c: Coord) -> T {
        self.grid.idx(c).map_or(self.fill, |i| self.values[i])
    }

    #[inline]
    pub(crate) fn set(&mut self, c: Coord, v: T) {
        if let Some(i) = self.grid.idx(c) {
            self.values[i] = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_semantics() {
        let grid = Grid::empty(2, 2).unwrap();
        let mut s = CellSet::new(&grid);
        assert!(s.insert(Coord::new(1, 1)));
        assert!(!s.insert(Coord::new(1, 1)));
        assert!(!s.insert(Coord::new(5, 5)));
        assert!(s.contains(Coord::new(1, 1)));
        s.remove(Coord::new(1, 1));
        assert!(!s.contains(Coord::new(1, 1)));
    }

    #[test]
    fn map_defaults_out_of_bounds() {
        let grid = Grid::empty(2, 2).unwrap();
        let mut m = CellMap::new(&grid, u32::MAX);
        m.set(Coord::new(0, 1), 4);
        m.set(Coord::new(-1, 0), 4);
        assert_eq!(m.get(Coord::new(0, 1)), 4);
        assert_eq!(m.get(Coord::new(-1, 0)), u32::MAX);
        assert_eq!(m.get(Coord::new(1, 1)), u32::MAX);
    }
}
