//! Warehouse floor plans: shelf blocks between aisles.

use rand::{Rng, RngExt};
use sapf_core::{Coord, Grid};

use crate::error::GenError;
use crate::mapgen::MapGen;

/// Parameters of a warehouse layout.
///
/// Inside a clear `margin`, columns alternate between `aisle_width` free
/// columns and `shelf_width` shelf columns (aisle first), and rows alternate
/// between `shelf_length` shelf rows and `cross_aisle_width` free rows.
/// Each shelf cell is then removed with probability `gap_probability`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WarehouseSpec {
    pub width: i32,
    pub height: i32,
    pub aisle_width: i32,
    pub shelf_width: i32,
    pub shelf_length: i32,
    pub cross_aisle_width: i32,
    pub margin: i32,
    pub gap_probability: f64,
    /// Defaults to the first free cell in row-major order.
    pub start: Option<Coord>,
    /// Defaults to the last free cell in row-major order.
    pub goal: Option<Coord>,
}

impl Default for WarehouseSpec {
    fn default() -> Self {
        Self {
            width: 32,
            height: 24,
            aisle_width: 1,
            shelf_width: 2,
            shelf_length: 6,
            cross_aisle_width: 1,
            margin: 1,
            gap_probability: 0.0,
            start: None,
            goal: None,
        }
    }
}

impl WarehouseSpec {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), GenError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GenError::invalid(format!(
                "warehouse size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let positive = [
            ("aisle_width", self.aisle_width),
            ("shelf_width", self.shelf_width),
            ("shelf_length", self.shelf_length),
            ("cross_aisle_width", self.cross_aisle_width),
        ];
        if let Some((name, v)) = positive.into_iter().find(|&(_, v)| v < 1) {
            return Err(GenError::invalid(format!("{name} must be at least 1, got {v}")));
        }
        if self.margin < 0 || 2 * self.margin >= self.width.min(self.height) {
            return Err(GenError::invalid(format!(
                "margin {} leaves no room inside {}x{}",
                self.margin, self.width, self.height
            )));
        }
        if !(0.0..=1.0).contains(&self.gap_probability) {
            return Err(GenError::invalid(format!(
                "gap probability must be in [0, 1], got {}",
                self.gap_probability
            )));
        }
        Ok(())
    }

    /// Whether `c` is a shelf cell of the base layout, before gaps.
    pub fn is_shelf(&self, c: Coord) -> bool {
        let inner_x = c.x - self.margin;
        let inner_y = c.y - self.margin;
        if inner_x < 0
            || inner_y < 0
            || c.x >= self.width - self.margin
            || c.y >= self.height - self.margin
        {
            return false;
        }
        let in_shelf_column = inner_x % (self.aisle_width + self.shelf_width) >= self.aisle_width;
        let in_shelf_row = inner_y % (self.shelf_length + self.cross_aisle_width) < self.shelf_length;
        in_shelf_column && in_shelf_row
    }
}

impl<R: Rng> MapGen<R> {
    /// Lay out shelves and aisles per `spec`.
    pub fn warehouse(&mut self, spec: &WarehouseSpec) -> Result<Grid, GenError> {
        spec.validate()?;

        let mut shelves = Vec::new();
        let mut free = Vec::new();
        for y in 0..spec.height {
            for x in 0..spec.width {
                let c = Coord::new(x, y);
                let gap = spec.gap_probability > 0.0 && self.rng.random::<f64>() < spec.gap_probability;
                if spec.is_shelf(c) && !gap {
                    shelves.push(c);
                } else {
                    free.push(c);
                }
            }
        }

        let start = spec.start.or_else(|| free.first().copied());
        let goal = spec.goal.or_else(|| free.last().copied());
        let shelves = shelves
            .into_iter()
            .filter(|&c| Some(c) != spec.start && Some(c) != spec.goal);
        Ok(Grid::new(spec.width, spec.height, shelves, start, goal)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sapf_paths::{Bfs, PathFinder};

    fn mapgen(seed: u64) -> MapGen<StdRng> {
        MapGen::with_rng(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn base_layout() {
        let spec = WarehouseSpec {
            shelf_length: 2,
            ..WarehouseSpec::new(9, 7)
        };
        let grid = mapgen(0).warehouse(&spec).unwrap();
        assert_eq!(
            grid.to_ascii(),
            "\
            S........\n\
            ..##.##..\n\
            ..##.##..\n\
            .........\n\
            ..##.##..\n\
            ..##.##..\n\
            ........G\n"
        );
    }

    #[test]
    fn margin_is_clear_and_goal_reachable() {
        let spec = WarehouseSpec::default();
        let grid = mapgen(0).warehouse(&spec).unwrap();
        for x in 0..grid.width() {
            assert!(grid.is_free(Coord::new(x, 0)));
            assert!(grid.is_free(Coord::new(x, grid.height() - 1)));
        }
        for y in 0..grid.height() {
            assert!(grid.is_free(Coord::new(0, y)));
            assert!(grid.is_free(Coord::new(grid.width() - 1, y)));
        }
        assert!(grid.obstacle_count() > 0);
        assert!(!Bfs.find_path(&grid).unwrap().is_empty());
    }

    #[test]
    fn gaps_only_remove_shelves() {
        let base = mapgen(0).warehouse(&WarehouseSpec::default()).unwrap();
        let spec = WarehouseSpec {
            gap_probability: 0.3,
            ..WarehouseSpec::default()
        };
        let gappy = mapgen(4).warehouse(&spec).unwrap();
        assert!(gappy.obstacle_count() < base.obstacle_count());
        assert!(gappy.obstacles().all(|c| base.is_blocked(c)));
        assert_eq!(gappy, mapgen(4).warehouse(&spec).unwrap());
    }

    #[test]
    fn rejects_bad_parameters() {
        let mut mg = mapgen(0);
        for spec in [
            WarehouseSpec::new(0, 5),
            WarehouseSpec {
                aisle_width: 0,
                ..WarehouseSpec::default()
            },
            WarehouseSpec {
                margin: 12,
                ..WarehouseSpec::default()
            },
            WarehouseSpec {
                gap_probability: -0.1,
                ..WarehouseSpec::default()
            },
        ] {
            assert!(matches!(mg.warehouse(&spec), Err(GenError::InvalidParameter(_))));
        }
    }
}
