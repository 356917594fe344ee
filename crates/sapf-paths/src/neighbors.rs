use sapf_core::{Coord, Grid};

/// In-bounds, non-obstacle cardinal neighbours of `c`, in the fixed
/// enumeration order of [`Coord::neighbors_4`].
#[inline]
pub(crate) fn free_neighbors(grid: &Grid, c: Coord) -> impl Iterator<Item = Coord> + '_ {
    c.neighbors_4().into_iter().filter(move |&n| grid.is_free(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_bounds_and_obstacles() {
        let grid = Grid::from_ascii(
            "\
            .#.\n\
            ...\n",
        )
        .unwrap();
        let n: Vec<_> = free_neighbors(&grid, Coord::new(0, 0)).collect();
        assert_eq!(n, vec![Coord::new(0, 1)]);
        let n: Vec<_> = free_neighbors(&grid, Coord::new(1, 1)).collect();
        assert_eq!(n, vec![Coord::new(2, 1), Coord::new(0, 1)]);
    }
}
