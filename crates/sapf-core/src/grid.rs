//! The [`Grid`] type, an immutable grid world of dimensions, obstacles and
//! optional start/goal cells.
//!
//! Every constructor validates the grid invariants and returns a
//! [`MapValidationError`] naming the offending field. Edits never mutate in
//! place; they produce a new, re-validated `Grid`.

use std::collections::BTreeSet;

use crate::coord::Coord;
use crate::error::{Field, MapValidationError};

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// An immutable 2D grid world.
///
/// Invariants, enforced at construction and never relaxed:
/// - `width > 0` and `height > 0`;
/// - every obstacle, the start and the goal lie in `[0,width)×[0,height)`;
/// - start and goal are not obstacles and are not the same cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    obstacles: BTreeSet<Coord>,
    // Row-major occupancy, mirrors `obstacles` for O(1) queries.
    blocked: Vec<bool>,
    start: Option<Coord>,
    goal: Option<Coord>,
}

impl Grid {
    /// Create and validate a new grid.
    pub fn new(
        width: i32,
        height: i32,
        obstacles: impl IntoIterator<Item = Coord>,
        start: Option<Coord>,
        goal: Option<Coord>,
    ) -> Result<Self, MapValidationError> {
        if width <= 0 || height <= 0 {
            return Err(MapValidationError::NonPositiveSize { width, height });
        }

        let mut grid = Self {
            width,
            height,
            obstacles: BTreeSet::new(),
            blocked: vec![false; width as usize * height as usize],
            start: None,
            goal: None,
        };

        for c in obstacles {
            grid.check_bounds(Field::Obstacle, c)?;
            if let Some(i) = grid.idx(c) {
                grid.blocked[i] = true;
            }
            grid.obstacles.insert(c);
        }

        if let Some(s) = start {
            grid.check_bounds(Field::Start, s)?;
            if grid.is_blocked(s) {
                return Err(MapValidationError::OnObstacle {
                    field: Field::Start,
                    coord: s,
                });
            }
        }
        if let Some(g) = goal {
            grid.check_bounds(Field::Goal, g)?;
            if grid.is_blocked(g) {
                return Err(MapValidationError::OnObstacle {
                    field: Field::Goal,
                    coord: g,
                });
            }
        }
        if let (Some(s), Some(g)) = (start, goal) {
            if s == g {
                return Err(MapValidationError::StartEqualsGoal(s));
            }
        }

        grid.start = start;
        grid.goal = goal;
        Ok(grid)
    }

    /// An obstacle-free grid with no start or goal.
    pub fn empty(width: i32, height: i32) -> Result<Self, MapValidationError> {
        Self::new(width, height, [], None, None)
    }

    fn check_bounds(&self, field: Field, coord: Coord) -> Result<(), MapValidationError> {
        if self.in_bounds(coord) {
            Ok(())
        } else {
            Err(MapValidationError::OutOfBounds {
                field,
                coord,
                width: self.width,
                height: self.height,
            })
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    /// Always `false`: a valid grid has at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    #[inline]
    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Option<Coord> {
        self.goal
    }

    /// Obstacles in ascending `(x, y)` order.
    pub fn obstacles(&self) -> impl Iterator<Item = Coord> + '_ {
        self.obstacles.iter().copied()
    }

    /// Number of obstacle cells.
    #[inline]
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Whether `c` lies inside `[0,width)×[0,height)`.
    #[inline]
    pub fn in_bounds(&self, c: Coord) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.width && c.y < self.height
    }

    /// Whether `c` is an obstacle. Out-of-bounds cells are not obstacles.
    #[inline]
    pub fn is_blocked(&self, c: Coord) -> bool {
        self.idx(c).is_some_and(|i| self.blocked[i])
    }

    /// Whether `c` is in bounds and not an obstacle.
    #[inline]
    pub fn is_free(&self, c: Coord) -> bool {
        self.idx(c).is_some_and(|i| !self.blocked[i])
    }

    /// Row-major flat index of `c`, or `None` if out of bounds.
    #[inline]
    pub fn idx(&self, c: Coord) -> Option<usize> {
        if !self.in_bounds(c) {
            return None;
        }
        Some(c.y as usize * self.width as usize + c.x as usize)
    }

    /// Inverse of [`idx`](Self::idx).
    #[inline]
    pub fn coord(&self, idx: usize) -> Coord {
        let w = self.width as usize;
        Coord::new((idx % w) as i32, (idx / w) as i32)
    }

    /// Free cells in row-major order.
    pub fn free_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.blocked
            .iter()
            .enumerate()
            .filter(|(_, b)| !**b)
            .map(|(i, _)| self.coord(i))
    }

    /// Number of free cells.
    pub fn free_count(&self) -> usize {
        self.len() - self.obstacles.len()
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    /// A copy with the start replaced.
    pub fn with_start(&self, start: Option<Coord>) -> Result<Self, MapValidationError> {
        Self::new(
            self.width,
            self.height,
            self.obstacles.iter().copied(),
            start,
            self.goal,
        )
    }

    /// A copy with the goal replaced.
    pub fn with_goal(&self, goal: Option<Coord>) -> Result<Self, MapValidationError> {
        Self::new(
            self.width,
            self.height,
            self.obstacles.iter().copied(),
            self.start,
            goal,
        )
    }

    /// A copy with `c` added as an obstacle.
    pub fn with_obstacle(&self, c: Coord) -> Result<Self, MapValidationError> {
        Self::new(
            self.width,
            self.height,
            self.obstacles.iter().copied().chain(Some(c)),
            self.start,
            self.goal,
        )
    }

    /// A copy with the obstacle at `c` removed (no-op if there is none).
    pub fn without_obstacle(&self, c: Coord) -> Result<Self, MapValidationError> {
        Self::new(
            self.width,
            self.height,
            self.obstacles.iter().copied().filter(|&o| o != c),
            self.start,
            self.goal,
        )
    }

    /// A copy with the obstacle state of `c` flipped.
    pub fn toggle_obstacle(&self, c: Coord) -> Result<Self, MapValidationError> {
        if self.is_blocked(c) {
            self.without_obstacle(c)
        } else {
            self.with_obstacle(c)
        }
    }

    // -----------------------------------------------------------------------
    // Canonical structural form
    // -----------------------------------------------------------------------

    /// Plain structural representation: obstacles sorted ascending.
    pub fn to_canonical_form(&self) -> CanonicalGrid {
        CanonicalGrid {
            width: self.width,
            height: self.height,
            start: self.start.map(Into::into),
            goal: self.goal.map(Into::into),
            obstacles: self.obstacles.iter().map(|&c| c.into()).collect(),
        }
    }

    /// Rebuild and re-validate a grid from its structural form.
    pub fn from_canonical_form(form: &CanonicalGrid) -> Result<Self, MapValidationError> {
        Self::new(
            form.width,
            form.height,
            form.obstacles.iter().map(|&p| Coord::from(p)),
            form.start.map(Coord::from),
            form.goal.map(Coord::from),
        )
    }

    // -----------------------------------------------------------------------
    // ASCII layout
    // -----------------------------------------------------------------------

    /// Parse a text layout: `.` free, `#` obstacle, `S` start, `G` goal.
    ///
    /// Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(s: &str) -> Result<Self, MapValidationError> {
        let rows: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.chars().count() as i32);

        let mut obstacles = Vec::new();
        let mut start = None;
        let mut goal = None;

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() as i32 != width {
                return Err(MapValidationError::Layout(format!(
                    "row {y} has {} cells, expected {width}",
                    row.chars().count()
                )));
            }
            for (x, ch) in row.chars().enumerate() {
                let c = Coord::new(x as i32, y as i32);
                match ch {
                    '.' => {}
                    '#' => obstacles.push(c),
                    'S' if start.is_none() => start = Some(c),
                    'G' if goal.is_none() => goal = Some(c),
                    'S' | 'G' => {
                        return Err(MapValidationError::Layout(format!(
                            "duplicate '{ch}' at {c}"
                        )));
                    }
                    other => {
                        return Err(MapValidationError::Layout(format!(
                            "invalid cell '{other}' at {c}"
                        )));
                    }
                }
            }
        }

        Self::new(width, height, obstacles, start, goal)
    }

    /// Render the grid in the layout accepted by [`from_ascii`](Self::from_ascii).
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.len() + self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let c = Coord::new(x, y);
                let ch = if Some(c) == self.start {
                    'S'
                } else if Some(c) == self.goal {
                    'G'
                } else if self.is_blocked(c) {
                    '#'
                } else {
                    '.'
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

// ---------------------------------------------------------------------------
// CanonicalGrid
// ---------------------------------------------------------------------------

/// Structural form of a [`Grid`]:
/// `{width, height, start: [x,y] | null, goal: [x,y] | null, obstacles: [[x,y], ...]}`.
///
/// No invariants are enforced on this type; use
/// [`Grid::from_canonical_form`] to validate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanonicalGrid {
    pub width: i32,
    pub height: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub start: Option<[i32; 2]>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub goal: Option<[i32; 2]>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub obstacles: Vec<[i32; 2]>,
}

impl TryFrom<CanonicalGrid> for Grid {
    type Error = MapValidationError;

    fn try_from(form: CanonicalGrid) -> Result<Self, Self::Error> {
        Grid::from_canonical_form(&form)
    }
}

impl From<&Grid> for CanonicalGrid {
    fn from(grid: &Grid) -> Self {
        grid.to_canonical_form()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Grid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_canonical_form().serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Grid {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let form = CanonicalGrid::deserialize(deserializer)?;
        Grid::from_canonical_form(&form).map_err(serde::de::Error::custom)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn grid_serializes_as_canonical_form() {
        let g = Grid::new(3, 2, [Coord::new(1, 0)], Some(Coord::new(0, 0)), None).unwrap();
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "width": 3,
                "height": 2,
                "start": [0, 0],
                "goal": null,
                "obstacles": [[1, 0]],
            })
        );
        let back: Grid = serde_json::from_value(json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn deserialization_rejects_invalid_grids() {
        let json = r#"{"width": 2, "height": 2, "start": [0, 0], "goal": [0, 0]}"#;
        assert!(serde_json::from_str::<Grid>(json).is_err());
        let json = r#"{"width": 2, "height": 2}"#;
        let g: Grid = serde_json::from_str(json).unwrap();
        assert_eq!(g.obstacle_count(), 0);
    }
}
