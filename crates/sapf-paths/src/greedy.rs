use std::collections::BTreeSet;

use sapf_core::{Coord, Grid};

use crate::cells::CellSet;
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::neighbors::free_neighbors;
use crate::path::{ParentMap, reconstruct_path};
use crate::step::{Expand, SearchStatus, SearchStep, Steps};
use crate::traits::{PathFinder, endpoints};

/// Greedy best-first search ordered purely by the Manhattan heuristic.
///
/// Cells are discovered at most once and never re-parented, so the path is
/// usually short but not guaranteed optimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyBestFirst;

impl PathFinder for GreedyBestFirst {
    fn name(&self) -> &'static str {
        "Greedy Best-First"
    }

    fn steps<'g>(&self, grid: &'g Grid) -> Result<Steps<'g>, SearchError> {
        let (start, goal) = endpoints(grid, self.name())?;
        if start == goal {
            return Ok(Steps::trivial(self.name(), start));
        }
        Ok(Steps::new(self.name(), GreedyState::new(grid, start, goal)))
    }
}

struct GreedyState<'g> {
    grid: &'g Grid,
    start: Coord,
    goal: Coord,
    frontier: Frontier<u32>,
    open: BTreeSet<Coord>,
    in_open: CellSet<'g>,
    closed: CellSet<'g>,
    closed_order: BTreeSet<Coord>,
    parents: ParentMap<'g>,
}

impl<'g> GreedyState<'g> {
    fn new(grid: &'g Grid, start: Coord, goal: Coord) -> Self {
        let mut frontier = Frontier::new();
        frontier.push(start.manhattan(goal), start);
        let mut in_open = CellSet::new(grid);
        in_open.insert(start);
        Self {
            grid,
            start,
            goal,
            frontier,
            open: BTreeSet::from([start]),
            in_open,
            closed: CellSet::new(grid),
            closed_order: BTreeSet::new(),
            parents: ParentMap::new(grid),
        }
    }

    fn open_snapshot(&self) -> Vec<Coord> {
        let mut open: Vec<Coord> = self.open.iter().copied().collect();
        open.sort_by_key(|&c| (c.manhattan(self.goal), c));
        open
    }
}

impl Expand for GreedyState<'_> {
    fn expand(&mut self) -> Result<SearchStep, SearchError> {
        while let Some(entry) = self.frontier.pop() {
            let current = entry.pos;
            self.in_open.remove(current);
            self.open.remove(&current);
            if !self.closed.insert(current) {
                continue;
            }
            self.closed_order.insert(current);

            let mut log = format!("Expanding {current} (h={}).", entry.key);

            if current == self.goal {
                log.push_str("\nGoal reached. Path found.");
                return Ok(SearchStep {
                    current,
                    open_set: self.open_snapshot(),
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
                let h = nb.manhattan(self.goal);
                self.parents.set(nb, current);
                self.frontier.push(h, nb);
                self.in_open.insert(nb);
                self.open.insert(nb);
                open_added.push(nb);
                log.push_str(&format!("\n  Added neighbor {nb}: h={h}."));
            }

            return Ok(SearchStep {
                current,
                open_set: self.open_snapshot(),
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
            log: "Open list exhausted. No path exists.".to_string(),
            status: SearchStatus::NoPath,
        })
    }
}
