//! The step-observable search protocol: [`SearchStatus`], [`SearchStep`]
//! snapshots, and the pull-based [`Steps`] sequence every algorithm returns.

use std::fmt;
use std::iter::FusedIterator;
use std::time::{Duration, Instant};

use sapf_core::Coord;

use crate::error::SearchError;

// ---------------------------------------------------------------------------
// SearchStatus
// ---------------------------------------------------------------------------

/// Status tag carried by every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    Running,
    Found,
    NoPath,
}

impl SearchStatus {
    /// `Found` and `NoPath` end a sequence.
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Running => "RUNNING",
            Self::Found => "FOUND",
            Self::NoPath => "NO_PATH",
        })
    }
}

// ---------------------------------------------------------------------------
// SearchStep
// ---------------------------------------------------------------------------

/// One snapshot of a search's internal state, produced per unit of progress
/// (a node expansion, a relaxation pass or a generation).
///
/// Renderers paint it in layer order: base grid, `closed_set`, `open_set`,
/// `best_path`, then `current`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStep {
    /// The cell being processed.
    pub current: Coord,
    /// Frontier, in the algorithm's own order. No duplicates.
    pub open_set: Vec<Coord>,
    /// Settled cells. No duplicates.
    pub closed_set: Vec<Coord>,
    /// Cells that entered the frontier during this step.
    pub open_added: Vec<Coord>,
    /// Best known path (to `current`, or to the goal once found).
    pub best_path: Option<Vec<Coord>>,
    /// Human-readable trace of this step.
    pub log: String,
    pub status: SearchStatus,
}

impl SearchStep {
    /// The single snapshot of a search whose start is its goal.
    pub fn trivial(at: Coord) -> Self {
        Self {
            current: at,
            open_set: vec![at],
            closed_set: Vec::new(),
            open_added: vec![at],
            best_path: Some(vec![at]),
            log: "Start equals goal. Trivial path found.".to_string(),
            status: SearchStatus::Found,
        }
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// Internal search state advanced one snapshot at a time.
///
/// `expand` is never called again once it has returned a terminal step or an
/// error.
pub(crate) trait Expand {
    fn expand(&mut self) -> Result<SearchStep, SearchError>;
}

struct Trivial(Coord);

impl Expand for Trivial {
    fn expand(&mut self) -> Result<SearchStep, SearchError> {
        Ok(SearchStep::trivial(self.0))
    }
}

/// A lazy, single-pass, forward-only sequence of snapshots.
///
/// Each call to `next` performs exactly one unit of work. The sequence ends
/// permanently after the first `Found`/`NoPath` step or the first error.
/// Dropping it cancels the search.
pub struct Steps<'g> {
    algorithm: &'static str,
    state: Box<dyn Expand + 'g>,
    produced: usize,
    done: bool,
}

impl<'g> Steps<'g> {
    pub(crate) fn new(algorithm: &'static str, state: impl Expand + 'g) -> Self {
        Self {
            algorithm,
            state: Box::new(state),
            produced: 0,
            done: false,
        }
    }

    pub(crate) fn trivial(algorithm: &'static str, at: Coord) -> Self {
        Self::new(algorithm, Trivial(at))
    }

    /// Display name of the producing algorithm.
    #[inline]
    pub fn algorithm(&self) -> &'static str {
        self.algorithm
    }

    /// Number of snapshots produced so far.
    #[inline]
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Whether a terminal step (or an error) has been produced.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.done
    }

    /// Drain the remaining snapshots and summarize the run.
    pub fn finish(mut self) -> Result<SearchOutcome, SearchError> {
        let started = Instant::now();
        let mut last = None;
        for step in self.by_ref() {
            last = Some(step?);
        }
        let elapsed = started.elapsed();

        let (status, path) = match last {
            Some(step) if step.status == SearchStatus::Found => {
                (SearchStatus::Found, step.best_path.unwrap_or_default())
            }
            _ => (SearchStatus::NoPath, Vec::new()),
        };
        Ok(SearchOutcome {
            status,
            path,
            steps: self.produced,
            elapsed,
        })
    }
}

impl Iterator for Steps<'_> {
    type Item = Result<SearchStep, SearchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.state.expand();
        self.produced += 1;
        match &result {
            Ok(step) => {
                log::trace!(
                    "{}: step {} at {} ({})",
                    self.algorithm,
                    self.produced,
                    step.current,
                    step.status
                );
                if step.status.is_terminal() {
                    self.done = true;
                    log::debug!(
                        "{}: {} after {} steps",
                        self.algorithm,
                        step.status,
                        self.produced
                    );
                }
            }
            Err(e) => {
                self.done = true;
                log::debug!("{}: aborted: {e}", self.algorithm);
            }
        }
        Some(result)
    }
}

impl FusedIterator for Steps<'_> {}

impl fmt::Debug for Steps<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Steps")
            .field("algorithm", &self.algorithm)
            .field("produced", &self.produced)
            .field("done", &self.done)
            .finish()
    }
}

/// Summary of a run drained to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// `Found` or `NoPath`.
    pub status: SearchStatus,
    /// Start-to-goal path; empty unless `Found`.
    pub path: Vec<Coord>,
    /// Snapshots produced over the whole run.
    pub steps: usize,
    /// Wall-clock time spent draining.
    pub elapsed: Duration,
}

impl SearchOutcome {
    /// Number of moves along the path.
    pub fn distance(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown {
        left: usize,
        at: Coord,
    }

    impl Expand for Countdown {
        fn expand(&mut self) -> Result<SearchStep, SearchError> {
            self.left -= 1;
            let status = if self.left == 0 {
                SearchStatus::NoPath
            } else {
                SearchStatus::Running
            };
            Ok(SearchStep {
                current: self.at,
                open_set: Vec::new(),
                closed_set: vec![self.at],
                open_added: Vec::new(),
                best_path: None,
                log: format!("{} left", self.left),
                status,
            })
        }
    }

    struct Broken;

    impl Expand for Broken {
        fn expand(&mut self) -> Result<SearchStep, SearchError> {
            Err(SearchError::CycleDetected { at: Coord::ZERO })
        }
    }

    #[test]
    fn stops_after_terminal_step() {
        let mut steps = Steps::new(
            "countdown",
            Countdown {
                left: 3,
                at: Coord::ZERO,
            },
        );
        let statuses: Vec<_> = steps.by_ref().map(|s| s.unwrap().status).collect();
        assert_eq!(
            statuses,
            vec![SearchStatus::Running, SearchStatus::Running, SearchStatus::NoPath]
        );
        assert!(steps.is_finished());
        assert!(steps.next().is_none());
        assert_eq!(steps.produced(), 3);
    }

    #[test]
    fn trivial_sequence_is_single_found_step() {
        let at = Coord::new(2, 1);
        let steps: Vec<_> = Steps::trivial("t", at).map(Result::unwrap).collect();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].status, SearchStatus::Found);
        assert_eq!(steps[0].best_path, Some(vec![at]));
        assert_eq!(steps[0].open_set, vec![at]);
    }

    #[test]
    fn error_ends_sequence() {
        let mut steps = Steps::new("broken", Broken);
        assert!(steps.next().unwrap().is_err());
        assert!(steps.next().is_none());
        assert!(Steps::new("broken", Broken).finish().is_err());
    }

    #[test]
    fn finish_summarizes() {
        let outcome = Steps::trivial("t", Coord::new(1, 1)).finish().unwrap();
        assert_eq!(outcome.status, SearchStatus::Found);
        assert_eq!(outcome.path, vec![Coord::new(1, 1)]);
        assert_eq!(outcome.steps, 1);
        assert_eq!(outcome.distance(), 0);

        let outcome = Steps::new(
            "countdown",
            Countdown {
                left: 2,
                at: Coord::ZERO,
            },
        )
        .finish()
        .unwrap();
        assert_eq!(outcome.status, SearchStatus::NoPath);
        assert!(outcome.path.is_empty());
        assert_eq!(outcome.steps, 2);
    }

    #[test]
    fn terminal_statuses() {
        assert!(!SearchStatus::Running.is_terminal());
        assert!(SearchStatus::Found.is_terminal());
        assert!(SearchStatus::NoPath.is_terminal());
        assert_eq!(SearchStatus::NoPath.to_string(), "NO_PATH");
    }
}
