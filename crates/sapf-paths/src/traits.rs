use sapf_core::{Coord, Grid};

use crate::error::SearchError;
use crate::step::Steps;

/// Uniform contract honoured by every search algorithm.
///
/// The two modes are equivalent: draining [`steps`](Self::steps) yields the
/// same result as [`find_path`](Self::find_path).
pub trait PathFinder {
    /// Stable human-readable label.
    fn name(&self) -> &'static str;

    /// Step mode: a lazy sequence of snapshots, one per unit of work.
    ///
    /// Fails with [`SearchError::InvalidArgument`] before any work if the
    /// grid has no start or no goal.
    fn steps<'g>(&self, grid: &'g Grid) -> Result<Steps<'g>, SearchError>;

    /// Run to completion and return the start-to-goal path, empty if none.
    fn find_path(&self, grid: &Grid) -> Result<Vec<Coord>, SearchError> {
        Ok(self.steps(grid)?.finish()?.path)
    }
}

impl<P: PathFinder + ?Sized> PathFinder for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn steps<'g>(&self, grid: &'g Grid) -> Result<Steps<'g>, SearchError> {
        (**self).steps(grid)
    }
}

/// Start and goal of `grid`, or the precondition error naming `algorithm`.
pub(crate) fn endpoints(grid: &Grid, algorithm: &'static str) -> Result<(Coord, Coord), SearchError> {
    let start = grid.start().ok_or(SearchError::InvalidArgument {
        algorithm,
        missing: "start",
    })?;
    let goal = grid.goal().ok_or(SearchError::InvalidArgument {
        algorithm,
        missing: "goal",
    })?;
    Ok((start, goal))
}
