use std::collections::BTreeSet;

use sapf_core::{Coord, Grid};

use crate::cells::CellSet;
use crate::error::SearchError;
use crate::neighbors::free_neighbors;
use crate::path::{ParentMap, reconstruct_path};
use crate::step::{Expand, SearchStatus, SearchStep, Steps};
use crate::traits::{PathFinder, endpoints};

/// Depth-first search over a LIFO stack. Finds a path, not a shortest one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dfs;

impl PathFinder for Dfs {
    fn name(&self) -> &'static str {
        "DFS (4-way)"
    }

    fn steps<'g>(&self, grid: &'g Grid) -> Result<Steps<'g>, SearchError> {
        let (start, goal) = endpoints(grid, self.name())?;
        if start == goal {
            return Ok(Steps::trivial(self.name(), start));
        }
        Ok(Steps::new(self.name(), DfsState::new(grid, start, goal)))
    }
}

struct DfsState<'g> {
    grid: &'g Grid,
    start: Coord,
    goal: Coord,
    stack: Vec<Coord>,
    in_open: CellSet<'g>,
    closed: CellSet<'g>,
    closed_order: BTreeSet<Coord>,
    parents: ParentMap<'g>,
}

impl<'g> DfsState<'g> {
    fn new(grid: &'g Grid, start: Coord, goal: Coord) -> Self {
        let mut in_open = CellSet::new(grid);
        in_open.insert(start);
        Self {
            grid,
            start,
            goal,
            stack: vec![start],
            in_open,
            closed: CellSet::new(grid),
            closed_order: BTreeSet::new(),
            parents: ParentMap::new(grid),
        }
    }
}

impl Expand for DfsState<'_> {
    fn expand(&mut self) -> Result<SearchStep, SearchError> {
        while let Some(current) = self.stack.pop() {
            self.in_open.remove(current);
            if !self.closed.insert(current) {
                continue;
            }
            self.closed_order.insert(current);

            let mut log = format!("Expanding {current} (DFS).");

            if current == self.goal {
                log.push_str("\nGoal reached by expansion. Path found.");
                return Ok(SearchStep {
                    current,
                    open_set: self.stack.clone(),
                    closed_set: self.closed_order.iter().copied().collect(),
                    open_added: Vec::new(),
                    best_path: Some(reconstruct_path(&self.parents, self.goal)?),
                    log,
                    status: SearchStatus::Found,
                });
            }

            // Push in reverse so the first enumerated neighbour is popped first.
            let neighbors: Vec<Coord> = free_neighbors(self.grid, current).collect();
            let mut open_added = Vec::new();
            for &nb in neighbors.iter().rev() {
                if self.closed.contains(nb) || self.in_open.contains(nb) {
                    continue;
                }
                self.parents.set(nb, current);
                self.stack.push(nb);
                self.in_open.insert(nb);
                open_added.push(nb);
                log.push_str(&format!("\n  Pushed neighbor {nb}."));
            }

            return Ok(SearchStep {
                current,
                open_set: self.stack.clone(),
                closed_set: self.closed_order.iter().copied().collect(),
                open_added,
                best_path: Some(reconstruct_path(&self.parents, current)?),
                log,
                status: SearchStatus::Running,
            });
        }

        Ok(SearchStep {
            current: self.start,
            open_set: Vec::new(),
            closed_set: self.closed_order.iter().copied().collect(),
            open_added: Vec::new(),
            best_path: Some(vec![self.start]),
            log: "Stack exhausted. No path exists to goal.".to_string(),
            status: SearchStatus::NoPath,
        })
    }
}
