use sapf_core::{Coord, Grid};

use crate::cells::{CellMap, CellSet};
use crate::error::SearchError;
use crate::neighbors::free_neighbors;
use crate::path::{ParentMap, reconstruct_path};
use crate::step::{Expand, SearchStatus, SearchStep, Steps};
use crate::traits::{PathFinder, endpoints};

const INF: u32 = u32::MAX;

/// Bellman-Ford over the grid graph: every pass relaxes every edge.
///
/// One snapshot per pass. Runs at most `|V| - 1` passes and stops early on
/// a pass that changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellmanFord;

impl PathFinder for BellmanFord {
    fn name(&self) -> &'static str {
        "Bellman-Ford"
    }

    fn steps<'g>(&self, grid: &'g Grid) -> Result<Steps<'g>, SearchError> {
        let (start, goal) = endpoints(grid, self.name())?;
        if start == goal {
            return Ok(Steps::trivial(self.name(), start));
        }
        Ok(Steps::new(self.name(), BellmanFordState::new(grid, start, goal)))
    }
}

struct BellmanFordState<'g> {
    grid: &'g Grid,
    start: Coord,
    goal: Coord,
    // Free cells in row-major order.
    nodes: Vec<Coord>,
    dist: CellMap<'g, u32>,
    parents: ParentMap<'g>,
    pass: usize,
    max_passes: usize,
}

impl<'g> BellmanFordState<'g> {
    fn new(grid: &'g Grid, start: Coord, goal: Coord) -> Self {
        let nodes: Vec<Coord> = grid.free_cells().collect();
        let mut dist = CellMap::new(grid, INF);
        dist.set(start, 0);
        Self {
            grid,
            start,
            goal,
            max_passes: nodes.len().saturating_sub(1).max(1),
            nodes,
            dist,
            parents: ParentMap::new(grid),
            pass: 0,
        }
    }

    /// Relax every edge once, returning the cells whose distance improved,
    /// in first-improvement order.
    fn relax_all(&mut self) -> Vec<Coord> {
        let mut updated = Vec::new();
        let mut seen = CellSet::new(self.grid);
        for &u in &self.nodes {
            let du = self.dist.get(u);
            if du == INF {
                continue;
            }
            for v in free_neighbors(self.grid, u) {
                let candidate = du + 1;
                if candidate < self.dist.get(v) {
                    self.dist.set(v, candidate);
                    self.parents.set(v, u);
                    if seen.insert(v) {
                        updated.push(v);
                    }
                }
            }
        }
        updated
    }
}

impl Expand for BellmanFordState<'_> {
    fn expand(&mut self) -> Result<SearchStep, SearchError> {
        self.pass += 1;
        let updated = self.relax_all();

        let reached: Vec<Coord> = self
            .nodes
            .iter()
            .copied()
            .filter(|&c| self.dist.get(c) != INF)
            .collect();
        let mut closed_set = reached;
        closed_set.sort_unstable();

        let goal_known = self.dist.get(self.goal) != INF;
        let best_path = if goal_known {
            reconstruct_path(&self.parents, self.goal)?
        } else {
            vec![self.start]
        };

        let (status, log) = if updated.is_empty() {
            if goal_known {
                (
                    SearchStatus::Found,
                    format!("Pass {}: converged early (no changes). Path found.", self.pass),
                )
            } else {
                (
                    SearchStatus::NoPath,
                    format!("Pass {}: converged early (no changes). Goal unreachable.", self.pass),
                )
            }
        } else if self.pass >= self.max_passes {
            if goal_known {
                (
                    SearchStatus::Found,
                    format!("Pass {}/{}: max passes reached. Path found.", self.pass, self.max_passes),
                )
            } else {
                (
                    SearchStatus::NoPath,
                    format!("Pass {}/{}: max passes reached. Goal unreachable.", self.pass, self.max_passes),
                )
            }
        } else {
            (
                SearchStatus::Running,
                format!(
                    "Pass {}/{}. Updated {} nodes.",
                    self.pass,
                    self.max_passes,
                    updated.len()
                ),
            )
        };

        Ok(SearchStep {
            current: self.start,
            open_set: updated,
            closed_set,
            open_added: Vec::new(),
            best_path: Some(best_path),
            log,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_closed_monotonic, assert_step_invariants, collect_steps, fixture};

    #[test]
    fn one_step_per_pass_until_converged() {
        let grid = fixture("S..\n...\n..G");
        let steps = collect_steps(&BellmanFord, &grid);
        // Row-major sweeps settle the whole open grid in one pass; the second
        // pass confirms nothing changes.
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].status, SearchStatus::Running);
        assert_eq!(steps[0].closed_set.len(), 9);
        assert_eq!(steps[1].status, SearchStatus::Found);
        assert!(steps[1].open_set.is_empty());
        assert_eq!(steps[1].best_path.as_ref().map(Vec::len), Some(5));
        assert_step_invariants(&steps);
        assert_closed_monotonic(&steps);
    }

    #[test]
    fn upward_detours_need_extra_passes() {
        let grid = fixture(
            "\
            ...G\n\
            .###\n\
            ....\n\
            S...",
        );
        let steps = collect_steps(&BellmanFord, &grid);
        assert!(steps.len() > 2);
        let path = BellmanFord.find_path(&grid).unwrap();
        assert_eq!(path.len(), 7);
    }

    #[test]
    fn unreachable_goal() {
        let grid = fixture("S.#G");
        let steps = collect_steps(&BellmanFord, &grid);
        let last = steps.last().unwrap();
        assert_eq!(last.status, SearchStatus::NoPath);
        assert_eq!(last.current, Coord::new(0, 0));
        assert_step_invariants(&steps);
    }
}
