//! Step-observable pathfinding on 4-connected unit-cost grids.
//!
//! Every algorithm implements [`PathFinder`] and runs in two equivalent
//! modes: [`PathFinder::find_path`] runs to completion, while
//! [`PathFinder::steps`] returns a lazy [`Steps`] sequence that performs one
//! unit of work per [`SearchStep`] snapshot so a renderer can show the
//! frontier as it evolves.
//!
//! | Algorithm | Frontier | Unit of work | Optimal |
//! |---|---|---|---|
//! | [`Bfs`] | FIFO queue | expansion | yes |
//! | [`Dfs`] | LIFO stack | expansion | no |
//! | [`Dijkstra`] | min-heap on `g` | expansion | yes |
//! | [`AStar`] | min-heap on `g + h` | expansion | yes |
//! | [`WeightedAStar`] | min-heap on `g + w·h` | expansion | within `w` |
//! | [`GreedyBestFirst`] | min-heap on `h` | expansion | no |
//! | [`DStarLite`] | min-heap on `(min(g,rhs) + h, min(g,rhs))`, backward | node update | yes |
//! | [`BellmanFord`] | every edge | relaxation pass | yes |
//! | [`GeneticAlgorithm`] | population of move sequences | generation | no |
//!
//! Neighbours are always enumerated right, left, down, up, and every
//! snapshot is deterministic for a given grid (and seed, for the genetic
//! search). Algorithms are looked up by stable key through a [`Registry`].

mod astar;
mod bellman_ford;
mod bfs;
mod cells;
mod config;
mod dfs;
mod dijkstra;
mod dstar_lite;
mod error;
mod frontier;
mod genetic;
mod greedy;
mod neighbors;
mod path;
mod registry;
mod step;
mod traits;

#[cfg(test)]
mod testing;

pub use astar::{AStar, WeightedAStar};
pub use bellman_ford::BellmanFord;
pub use bfs::Bfs;
pub use config::{GeneticConfig, SearchConfig, Weight};
pub use dfs::Dfs;
pub use dijkstra::Dijkstra;
pub use dstar_lite::DStarLite;
pub use error::{RegistryError, SearchError};
pub use genetic::{GeneticAlgorithm, Move};
pub use greedy::GreedyBestFirst;
pub use path::{CameFrom, ParentMap, reconstruct_path, reconstruct_path_if_reachable};
pub use registry::{AlgorithmSpec, Category, Factory, Registry};
pub use step::{SearchOutcome, SearchStatus, SearchStep, Steps};
pub use traits::PathFinder;
