use std::collections::BTreeSet;

use sapf_core::{Coord, Grid};

use crate::cells::{CellMap, CellSet};
use crate::config::Weight;
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::neighbors::free_neighbors;
use crate::path::{ParentMap, reconstruct_path};
use crate::step::{Expand, SearchStatus, SearchStep, Steps};
use crate::traits::{PathFinder, endpoints};

/// A* with the Manhattan heuristic. Optimal on 4-connected unit-cost grids.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStar;

impl PathFinder for AStar {
    fn name(&self) -> &'static str {
        "A* (Manhattan)"
    }

    fn steps<'g>(&self, grid: &'g Grid) -> Result<Steps<'g>, SearchError> {
        weighted_steps(self.name(), Weight::ONE, grid)
    }
}

/// A* with an inflated heuristic, `f = g + w·h`.
///
/// Expands fewer nodes than A*; the path is at most `w` times longer than
/// optimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedAStar {
    weight: Weight,
}

impl WeightedAStar {
    pub fn new(weight: Weight) -> Self {
        Self { weight }
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }
}

impl PathFinder for WeightedAStar {
    fn name(&self) -> &'static str {
        "Weighted A*"
    }

    fn steps<'g>(&self, grid: &'g Grid) -> Result<Steps<'g>, SearchError> {
        weighted_steps(self.name(), self.weight, grid)
    }
}

fn weighted_steps<'g>(
    name: &'static str,
    weight: Weight,
    grid: &'g Grid,
) -> Result<Steps<'g>, SearchError> {
    let (start, goal) = endpoints(grid, name)?;
    if start == goal {
        return Ok(Steps::trivial(name, start));
    }
    Ok(Steps::new(name, AStarState::new(grid, weight, start, goal)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Score {
    g: u32,
    h: u32,
}

struct AStarState<'g> {
    grid: &'g Grid,
    weight: Weight,
    start: Coord,
    goal: Coord,
    frontier: Frontier<u64>,
    // Score of the freshest entry of each open cell; stale heap entries
    // are recognised by comparing against it.
    open_best: CellMap<'g, Option<Score>>,
    open: BTreeSet<Coord>,
    closed: CellSet<'g>,
    closed_order: BTreeSet<Coord>,
    parents: ParentMap<'g>,
}

impl<'g> AStarState<'g> {
    fn new(grid: &'g Grid, weight: Weight, start: Coord, goal: Coord) -> Self {
        let h0 = start.manhattan(goal);
        let mut open_best = CellMap::new(grid, None);
        open_best.set(start, Some(Score { g: 0, h: h0 }));
        let mut frontier = Frontier::new();
        frontier.push(weight.priority(0, h0), start);
        Self {
            grid,
            weight,
            start,
            goal,
            frontier,
            open_best,
            open: BTreeSet::from([start]),
            closed: CellSet::new(grid),
            closed_order: BTreeSet::new(),
            parents: ParentMap::new(grid),
        }
    }

    #[inline]
    fn f(&self, s: Score) -> u64 {
        self.weight.priority(s.g, s.h)
    }

    fn f_label(&self, s: Score) -> String {
        if self.weight == Weight::ONE {
            (s.g + s.h).to_string()
        } else {
            format!("{:.1}", f64::from(s.g) + self.weight.as_f64() * f64::from(s.h))
        }
    }

    fn open_snapshot(&self) -> Vec<Coord> {
        let mut open: Vec<(u64, u32, Coord)> = self
            .open
            .iter()
            .filter_map(|&c| self.open_best.get(c).map(|s| (self.f(s), s.h, c)))
            .collect();
        open.sort_unstable();
        open.into_iter().map(|(_, _, c)| c).collect()
    }
}

impl Expand for AStarState<'_> {
    fn expand(&mut self) -> Result<SearchStep, SearchError> {
        while let Some(entry) = self.frontier.pop() {
            let current = entry.pos;
            if self.closed.contains(current) {
                continue;
            }
            let Some(score) = self.open_best.get(current) else {
                continue;
            };
            if self.f(score) != entry.key {
                continue;
            }

            self.closed.insert(current);
            self.closed_order.insert(current);
            self.open_best.set(current, None);
            self.open.remove(&current);

            let mut log = format!(
                "Expanding {current}: g={}, h={}, f={}.",
                score.g,
                score.h,
                self.f_label(score)
            );

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
                let tentative = score.g + 1;
                let prev = self.open_best.get(nb);
                if prev.is_some_and(|p| tentative >= p.g) {
                    continue;
                }
                let next = Score {
                    g: tentative,
                    h: nb.manhattan(self.goal),
                };
                self.parents.set(nb, current);
                self.open_best.set(nb, Some(next));
                self.open.insert(nb);
                self.frontier.push(self.f(next), nb);
                open_added.push(nb);

                let f = self.f_label(next);
                match prev {
                    None => log.push_str(&format!(
                        "\n  Added neighbor {nb}: g={tentative}, h={}, f={f}.",
                        next.h
                    )),
                    Some(p) => log.push_str(&format!(
                        "\n  Updated neighbor {nb}: g {}->{tentative}, h={}, f={f}.",
                        p.g, next.h
                    )),
                }
            }

            // Show the tentative route to the goal once it has been reached,
            // otherwise the route to the expanded cell.
            let target = if self.parents.contains(self.goal) {
                self.goal
            } else {
                current
            };

            return Ok(SearchStep {
                current,
                open_set: self.open_snapshot(),
                closed_set: self.closed_order.iter().copied().collect(),
                open_added,
                best_path: Some(reconstruct_path(&self.parents, target)?),
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
