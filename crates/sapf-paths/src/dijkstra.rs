use std::collections::BTreeSet;

use sapf_core::{Coord, Grid};

use crate::cells::{CellMap, CellSet};
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::neighbors::free_neighbors;
use crate::path::{ParentMap, reconstruct_path};
use crate::step::{Expand, SearchStatus, SearchStep, Steps};
use crate::traits::{PathFinder, endpoints};

/// Uniform-cost search over a min-heap keyed by accumulated cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dijkstra;

impl PathFinder for Dijkstra {
    fn name(&self) -> &'static str {
        "Dijkstra"
    }

    fn steps<'g>(&self, grid: &'g Grid) -> Result<Steps<'g>, SearchError> {
        let (start, goal) = endpoints(grid, self.name())?;
        if start == goal {
            return Ok(Steps::trivial(self.name(), start));
        }
        Ok(Steps::new(self.name(), DijkstraState::new(grid, start, goal)))
    }
}

struct DijkstraState<'g> {
    grid: &'g Grid,
    start: Coord,
    goal: Coord,
    frontier: Frontier<u32>,
    // Best known cost of each open cell; `None` once closed or never reached.
    open_g: CellMap<'g, Option<u32>>,
    open: BTreeSet<Coord>,
    closed: CellSet<'g>,
    closed_order: BTreeSet<Coord>,
    parents: ParentMap<'g>,
}

impl<'g> DijkstraState<'g> {
    fn new(grid: &'g Grid, start: Coord, goal: Coord) -> Self {
        let mut open_g = CellMap::new(grid, None);
        open_g.set(start, Some(0));
        let mut frontier = Frontier::new();
        frontier.push(0, start);
        Self {
            grid,
            start,
            goal,
            frontier,
            open_g,
            open: BTreeSet::from([start]),
            closed: CellSet::new(grid),
            closed_order: BTreeSet::new(),
            parents: ParentMap::new(grid),
        }
    }

    fn open_snapshot(&self) -> Vec<Coord> {
        let mut open: Vec<Coord> = self.open.iter().copied().collect();
        open.sort_by_key(|&c| (self.open_g.get(c), c));
        open
    }
}

impl Expand for DijkstraState<'_> {
    fn expand(&mut self) -> Result<SearchStep, SearchError> {
        while let Some(entry) = self.frontier.pop() {
            let current = entry.pos;
            let g = entry.key;

            // Skip stale entries.
            if self.closed.contains(current) || self.open_g.get(current) != Some(g) {
                continue;
            }

            self.closed.insert(current);
            self.closed_order.insert(current);
            self.open_g.set(current, None);
            self.open.remove(&current);

            let mut log = format!("Expanding {current} (Dijkstra): g={g}.");

            if current == self.goal {
                log.push_str("\nGoal reached by expansion. Path found.");
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
                if self.closed.contains(nb) {
                    continue;
                }
                let tentative = g + 1;
                let prev = self.open_g.get(nb);
                if prev.is_some_and(|p| tentative >= p) {
                    continue;
                }
                self.parents.set(nb, current);
                self.open_g.set(nb, Some(tentative));
                self.open.insert(nb);
                self.frontier.push(tentative, nb);
                open_added.push(nb);
                match prev {
                    None => log.push_str(&format!("\n  Added neighbor {nb}: g={tentative}.")),
                    Some(p) => log.push_str(&format!("\n  Updated neighbor {nb}: g {p}->{tentative}.")),
                }
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
            log: "Open list exhausted. No path exists to goal.".to_string(),
            status: SearchStatus::NoPath,
        })
    }
}
