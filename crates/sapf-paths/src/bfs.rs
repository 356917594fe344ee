use std::collections::{BTreeSet, VecDeque};

use sapf_core::{Coord, Grid};

use crate::cells::CellSet;
use crate::error::SearchError;
use crate::neighbors::free_neighbors;
use crate::path::{ParentMap, reconstruct_path};
use crate::step::{Expand, SearchStatus, SearchStep, Steps};
use crate::traits::{PathFinder, endpoints};

/// Breadth-first search over a FIFO queue. Optimal on unit-cost grids.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bfs;

impl PathFinder for Bfs {
    fn name(&self) -> &'static str {
        "BFS (4-way)"
    }

    fn steps<'g>(&self, grid: &'g Grid) -> Result<Steps<'g>, SearchError> {
        let (start, goal) = endpoints(grid, self.name())?;
        if start == goal {
            return Ok(Steps::trivial(self.name(), start));
        }
        Ok(Steps::new(self.name(), BfsState::new(grid, start, goal)))
    }
}

struct BfsState<'g> {
    grid: &'g Grid,
    start: Coord,
    goal: Coord,
    queue: VecDeque<Coord>,
    in_open: CellSet<'g>,
    closed: CellSet<'g>,
    closed_order: BTreeSet<Coord>,
    parents: ParentMap<'g>,
}

impl<'g> BfsState<'g> {
    fn new(grid: &'g Grid, start: Coord, goal: Coord) -> Self {
        let mut in_open = CellSet::new(grid);
        in_open.insert(start);
        Self {
            grid,
            start,
            goal,
            queue: VecDeque::from([start]),
            in_open,
            closed: CellSet::new(grid),
            closed_order: BTreeSet::new(),
            parents: ParentMap::new(grid),
        }
    }
}

impl Expand for BfsState<'_> {
    fn expand(&mut self) -> Result<SearchStep, SearchError> {
        while let Some(current) = self.queue.pop_front() {
            self.in_open.remove(current);
            if !self.closed.insert(current) {
                continue;
            }
            self.closed_order.insert(current);

            let mut log = format!("Expanding {current} (BFS).");

            if current == self.goal {
                log.push_str("\nGoal reached by expansion. Path found.");
                return Ok(SearchStep {
                    current,
                    open_set: self.queue.iter().copied().collect(),
                    closed_set: self.closed_order.iter().copied().collect(),
                    open_added: Vec::new(),
                    best_path: Some(reconstruct_path(&self.parents, self.goal)?),
                    log,
                    status: SearchStatus::Found,
                });
            }

            let mut open_added = Vec::new();
            for nb in free_neighbors(self.grid, current) {
                if self.closed.contains(nb) || self.in_open.contains(nb) {
                    continue;
                }
                self.parents.set(nb, current);
                self.queue.push_back(nb);
                self.in_open.insert(nb);
                open_added.push(nb);
                log.push_str(&format!("\n  Enqueued neighbor {nb}."));
            }

            return Ok(SearchStep {
                current,
                open_set: self.queue.iter().copied().collect(),
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
            log: "Queue exhausted. No path exists to goal.".to_string(),
            status: SearchStatus::NoPath,
        })
    }
}
