use std::collections::BTreeSet;

use sapf_core::{Coord, Grid};

use crate::cells::CellMap;
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::neighbors::free_neighbors;
use crate::step::{Expand, SearchStatus, SearchStep, Steps};
use crate::traits::{PathFinder, endpoints};

/// Unreachable cost.
const INF: u32 = u32::MAX;

/// D* Lite priority: `(min(g, rhs) + h(start, u), min(g, rhs))`, compared
/// lexicographically.
type Key = (u32, u32);

/// D* Lite, first-solve phase only.
///
/// Searches backward from the goal, maintaining a consistent cost-to-goal
/// `g` and a one-step lookahead `rhs` for every cell. The path is read off
/// by greedy descent over `g` from the start.
#[derive(Debug, Clone, Copy, Default)]
pub struct DStarLite;

impl PathFinder for DStarLite {
    fn name(&self) -> &'static str {
        "D* Lite"
    }

    fn steps<'g>(&self, grid: &'g Grid) -> Result<Steps<'g>, SearchError> {
        let (start, goal) = endpoints(grid, self.name())?;
        if start == goal {
            return Ok(Steps::trivial(self.name(), start));
        }
        Ok(Steps::new(self.name(), DStarState::new(grid, start, goal)))
    }
}

/// Frontier membership of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    /// Never queued.
    New,
    /// Queued under the key stored in `queued_key`.
    Open,
    /// Processed and no longer queued.
    Settled,
}

struct DStarState<'g> {
    grid: &'g Grid,
    start: Coord,
    goal: Coord,
    g: CellMap<'g, u32>,
    rhs: CellMap<'g, u32>,
    tag: CellMap<'g, Tag>,
    // Key of the live heap entry of each open cell. Any other entry for the
    // cell is stale.
    queued_key: CellMap<'g, Key>,
    frontier: Frontier<Key>,
    open: BTreeSet<Coord>,
    closed: BTreeSet<Coord>,
}

fn cost(v: u32) -> String {
    if v == INF { "inf".to_string() } else { v.to_string() }
}

impl<'g> DStarState<'g> {
    fn new(grid: &'g Grid, start: Coord, goal: Coord) -> Self {
        let mut state = Self {
            grid,
            start,
            goal,
            g: CellMap::new(grid, INF),
            rhs: CellMap::new(grid, INF),
            tag: CellMap::new(grid, Tag::New),
            queued_key: CellMap::new(grid, (INF, INF)),
            frontier: Frontier::new(),
            open: BTreeSet::new(),
            closed: BTreeSet::new(),
        };
        state.rhs.set(goal, 0);
        state.enqueue(goal);
        state
    }

    fn key(&self, u: Coord) -> Key {
        let m = self.g.get(u).min(self.rhs.get(u));
        (m.saturating_add(self.start.manhattan(u)), m)
    }

    /// Queue `u` under its current key, superseding any earlier entry.
    /// Returns `true` if `u` was not already open.
    fn enqueue(&mut self, u: Coord) -> bool {
        let key = self.key(u);
        self.queued_key.set(u, key);
        self.frontier.push(key, u);
        self.tag.set(u, Tag::Open);
        self.closed.remove(&u);
        self.open.insert(u)
    }

    fn dequeue(&mut self, u: Coord) {
        if self.tag.get(u) == Tag::Open {
            self.tag.set(u, Tag::Settled);
            self.open.remove(&u);
            self.closed.insert(u);
        }
    }

    fn is_live(&self, u: Coord, key: Key) -> bool {
        self.tag.get(u) == Tag::Open && self.queued_key.get(u) == key
    }

    /// Recompute `rhs(u)` and fix `u`'s frontier membership. Returns `true`
    /// if `u` newly entered the frontier.
    fn update_vertex(&mut self, u: Coord) -> bool {
        if u != self.goal {
            let best = free_neighbors(self.grid, u)
                .map(|s| self.g.get(s).saturating_add(1))
                .min()
                .unwrap_or(INF);
            self.rhs.set(u, best);
        }
        if self.g.get(u) != self.rhs.get(u) {
            self.enqueue(u)
        } else {
            self.dequeue(u);
            false
        }
    }

    /// Drop stale entries so the heap top is live.
    fn top_key(&mut self) -> Option<Key> {
        while let Some(&top) = self.frontier.peek() {
            if self.is_live(top.pos, top.key) {
                return Some(top.key);
            }
            self.frontier.pop();
        }
        None
    }

    fn start_settled(&mut self) -> bool {
        let consistent = self.g.get(self.start) == self.rhs.get(self.start);
        match self.top_key() {
            None => true,
            Some(top) => consistent && top >= self.key(self.start),
        }
    }

    /// Follow the steepest descent of `g` from the start, stopping at the
    /// goal, at a cell with no finite neighbour, or after visiting every
    /// free cell.
    fn descend(&self) -> Vec<Coord> {
        let mut path = vec![self.start];
        let mut current = self.start;
        let limit = self.grid.free_count();
        while current != self.goal && path.len() <= limit {
            let mut best: Option<(u32, Coord)> = None;
            for n in free_neighbors(self.grid, current) {
                let gn = self.g.get(n);
                if gn < best.map_or(INF, |(b, _)| b) {
                    best = Some((gn, n));
                }
            }
            let Some((_, next)) = best else {
                break;
            };
            path.push(next);
            current = next;
        }
        path
    }

    fn open_snapshot(&self) -> Vec<Coord> {
        let mut open: Vec<(Key, Coord)> = self
            .open
            .iter()
            .map(|&c| (self.queued_key.get(c), c))
            .collect();
        open.sort_unstable();
        open.into_iter().map(|(_, c)| c).collect()
    }

    fn finish(&self) -> SearchStep {
        let closed_set = self.closed.iter().copied().collect();
        if self.g.get(self.start) == INF {
            return SearchStep {
                current: self.goal,
                open_set: Vec::new(),
                closed_set,
                open_added: Vec::new(),
                best_path: None,
                log: "Start is unreachable from goal. No path found.".to_string(),
                status: SearchStatus::NoPath,
            };
        }
        let path = self.descend();
        let status = if path.last() == Some(&self.goal) {
            SearchStatus::Found
        } else {
            SearchStatus::NoPath
        };
        SearchStep {
            current: self.start,
            open_set: self.open_snapshot(),
            closed_set,
            open_added: Vec::new(),
            log: format!(
                "D* Lite search converged. Start cost g={}.",
                self.g.get(self.start)
            ),
            best_path: Some(path),
            status,
        }
    }
}

impl Expand for DStarState<'_> {
    fn expand(&mut self) -> Result<SearchStep, SearchError> {
        loop {
            if self.start_settled() {
                return Ok(self.finish());
            }
            let Some(entry) = self.frontier.pop() else {
                return Ok(self.finish());
            };
            let u = entry.pos;
            let fresh = self.key(u);
            if entry.key < fresh {
                self.enqueue(u);
                continue;
            }

            let (g_u, rhs_u) = (self.g.get(u), self.rhs.get(u));
            let mut log = format!("Processing {u}: g={}, rhs={}", cost(g_u), cost(rhs_u));
            self.dequeue(u);

            let mut open_added = Vec::new();
            if g_u > rhs_u {
                log.push_str(" (overconsistent).");
                self.g.set(u, rhs_u);
            } else {
                log.push_str(" (underconsistent).");
                self.g.set(u, INF);
                if self.update_vertex(u) {
                    open_added.push(u);
                }
            }
            let neighbors: Vec<Coord> = free_neighbors(self.grid, u).collect();
            for s in neighbors {
                if self.update_vertex(s) {
                    open_added.push(s);
                    log.push_str(&format!(
                        "\n  Queued {s}: rhs={}.",
                        cost(self.rhs.get(s))
                    ));
                }
            }

            return Ok(SearchStep {
                current: u,
                open_set: self.open_snapshot(),
                closed_set: self.closed.iter().copied().collect(),
                open_added,
                best_path: Some(self.descend()),
                log,
                status: SearchStatus::Running,
            });
        }
    }
}
