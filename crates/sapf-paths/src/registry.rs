//! Stable lowercase keys mapped to algorithm factories.

use std::collections::BTreeMap;
use std::fmt;

use crate::astar::{AStar, WeightedAStar};
use crate::bellman_ford::BellmanFord;
use crate::bfs::Bfs;
use crate::config::SearchConfig;
use crate::dfs::Dfs;
use crate::dijkstra::Dijkstra;
use crate::dstar_lite::DStarLite;
use crate::error::RegistryError;
use crate::genetic::GeneticAlgorithm;
use crate::greedy::GreedyBestFirst;
use crate::traits::PathFinder;

/// Algorithm family. Declaration order is the listing rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Uninformed,
    Informed,
    Incremental,
    AnyAngle,
    Sampling,
    Learning,
    Optimization,
    GraphBased,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninformed => "Uninformed",
            Self::Informed => "Informed",
            Self::Incremental => "Incremental",
            Self::AnyAngle => "Any-Angle",
            Self::Sampling => "Sampling",
            Self::Learning => "Learning",
            Self::Optimization => "Optimization",
            Self::GraphBased => "Graph-Based",
        })
    }
}

/// Builds a fresh algorithm instance from the registry's configuration.
pub type Factory = fn(&SearchConfig) -> Box<dyn PathFinder>;

/// A registry entry.
#[derive(Clone, Copy)]
pub struct AlgorithmSpec {
    pub key: &'static str,
    pub display_name: &'static str,
    pub category: Category,
    pub factory: Factory,
}

impl fmt::Debug for AlgorithmSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmSpec")
            .field("key", &self.key)
            .field("display_name", &self.display_name)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

const BUILTINS: [AlgorithmSpec; 9] = [
    AlgorithmSpec {
        key: "bfs",
        display_name: "BFS (4-way)",
        category: Category::Uninformed,
        factory: |_| Box::new(Bfs),
    },
    AlgorithmSpec {
        key: "dfs",
        display_name: "DFS (4-way)",
        category: Category::Uninformed,
        factory: |_| Box::new(Dfs),
    },
    AlgorithmSpec {
        key: "dijkstra",
        display_name: "Dijkstra",
        category: Category::Uninformed,
        factory: |_| Box::new(Dijkstra),
    },
    AlgorithmSpec {
        key: "astar",
        display_name: "A* (Manhattan)",
        category: Category::Informed,
        factory: |_| Box::new(AStar),
    },
    AlgorithmSpec {
        key: "wastar",
        display_name: "Weighted A*",
        category: Category::Informed,
        factory: |cfg| Box::new(WeightedAStar::new(cfg.weight)),
    },
    AlgorithmSpec {
        key: "greedy",
        display_name: "Greedy Best-First",
        category: Category::Informed,
        factory: |_| Box::new(GreedyBestFirst),
    },
    AlgorithmSpec {
        key: "dstarlite",
        display_name: "D* Lite",
        category: Category::Incremental,
        factory: |_| Box::new(DStarLite),
    },
    AlgorithmSpec {
        key: "bellmanford",
        display_name: "Bellman-Ford",
        category: Category::GraphBased,
        factory: |_| Box::new(BellmanFord),
    },
    AlgorithmSpec {
        key: "genetic",
        display_name: "Genetic Algorithm",
        category: Category::Optimization,
        factory: |cfg| Box::new(GeneticAlgorithm::new(cfg.genetic.clone())),
    },
];

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Explicit, fixed set of available algorithms.
///
/// Keys are trimmed and lower-cased on registration and lookup.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    specs: BTreeMap<String, AlgorithmSpec>,
    config: SearchConfig,
}

impl Registry {
    /// An empty registry with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry whose factories receive `config`.
    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            specs: BTreeMap::new(),
            config,
        }
    }

    /// The nine built-in algorithms with default configuration.
    pub fn builtin() -> Self {
        Self::builtin_with_config(SearchConfig::default())
    }

    /// The nine built-in algorithms, configured with `config`.
    pub fn builtin_with_config(config: SearchConfig) -> Self {
        let mut reg = Self::with_config(config);
        for spec in BUILTINS {
            reg.specs.insert(normalize(spec.key), spec);
        }
        log::debug!("registry: {} built-in algorithms", reg.specs.len());
        reg
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Add an entry. Fails on an empty or already registered key.
    pub fn register(&mut self, spec: AlgorithmSpec) -> Result<(), RegistryError> {
        let key = normalize(spec.key);
        if key.is_empty() {
            return Err(RegistryError::EmptyKey);
        }
        if self.specs.contains_key(&key) {
            return Err(RegistryError::DuplicateKey(key));
        }
        self.specs.insert(key, spec);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<&AlgorithmSpec, RegistryError> {
        self.specs
            .get(&normalize(key))
            .ok_or_else(|| RegistryError::UnknownAlgorithm(key.to_string()))
    }

    /// Build a fresh instance of the algorithm registered under `key`.
    pub fn create(&self, key: &str) -> Result<Box<dyn PathFinder>, RegistryError> {
        let spec = self.get(key)?;
        Ok((spec.factory)(&self.config))
    }

    /// One fresh instance of every algorithm, keyed by normalized key.
    pub fn create_all(&self) -> BTreeMap<String, Box<dyn PathFinder>> {
        self.specs
            .iter()
            .map(|(k, spec)| (k.clone(), (spec.factory)(&self.config)))
            .collect()
    }

    /// Entries ordered by category rank, then display name.
    pub fn list(&self) -> Vec<&AlgorithmSpec> {
        let mut specs: Vec<&AlgorithmSpec> = self.specs.values().collect();
        specs.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.display_name.cmp(b.display_name))
        });
        specs
    }

    /// Registered keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::SearchStatus;
    use crate::testing::{
        LAYOUTS, assert_closed_monotonic, assert_step_invariants, assert_valid_path, collect_steps,
        final_status, fixture,
    };
    use crate::{GeneticConfig, SearchError};
    use sapf_core::{Coord, Grid};

    const DETERMINISTIC: [&str; 8] = [
        "bfs",
        "dfs",
        "dijkstra",
        "astar",
        "wastar",
        "greedy",
        "dstarlite",
        "bellmanford",
    ];

    fn seeded_registry() -> Registry {
        Registry::builtin_with_config(SearchConfig {
            genetic: GeneticConfig::default().with_seed(1),
            ..SearchConfig::default()
        })
    }

    #[test]
    fn lists_in_category_rank_then_name() {
        let reg = Registry::builtin();
        let keys: Vec<_> = reg.list().iter().map(|s| s.key).collect();
        assert_eq!(
            keys,
            vec![
                "bfs",
                "dfs",
                "dijkstra",
                "astar",
                "greedy",
                "wastar",
                "dstarlite",
                "genetic",
                "bellmanford"
            ]
        );
        assert_eq!(reg.len(), 9);
    }

    #[test]
    fn keys_are_normalized() {
        let reg = Registry::builtin();
        assert_eq!(reg.get("  AStar ").unwrap().display_name, "A* (Manhattan)");
        assert_eq!(reg.create("DStarLite").unwrap().name(), "D* Lite");
    }

    #[test]
    fn registration_errors() {
        let mut reg = Registry::builtin();
        let dup = AlgorithmSpec {
            key: " BFS",
            ..BUILTINS[0]
        };
        assert_eq!(reg.register(dup), Err(RegistryError::DuplicateKey("bfs".into())));
        let empty = AlgorithmSpec {
            key: "  ",
            ..BUILTINS[0]
        };
        assert_eq!(reg.register(empty), Err(RegistryError::EmptyKey));
        assert_eq!(
            reg.create("nope").err(),
            Some(RegistryError::UnknownAlgorithm("nope".into()))
        );
    }

    #[test]
    fn custom_entries_join_the_listing() {
        let mut reg = Registry::new();
        assert!(reg.is_empty());
        reg.register(AlgorithmSpec {
            key: "bfs-again",
            display_name: "Another BFS",
            category: Category::GraphBased,
            factory: |_| Box::new(Bfs),
        })
        .unwrap();
        reg.register(BUILTINS[3]).unwrap();
        let names: Vec<_> = reg.list().iter().map(|s| s.display_name).collect();
        assert_eq!(names, vec!["A* (Manhattan)", "Another BFS"]);
        assert_eq!(reg.keys().collect::<Vec<_>>(), vec!["astar", "bfs-again"]);
    }

    #[test]
    fn factory_receives_config() {
        let reg = Registry::builtin_with_config(SearchConfig {
            weight: crate::Weight::new(2, 1),
            ..SearchConfig::default()
        });
        assert_eq!(reg.config().weight, crate::Weight::new(2, 1));
        let all = reg.create_all();
        assert_eq!(all.len(), 9);
        assert_eq!(all["wastar"].name(), "Weighted A*");
        assert_eq!(reg.get("wastar").unwrap().display_name, "Weighted A*");
    }

    #[test]
    fn builtin_keys_are_normalized_and_distinct() {
        let reg = Registry::builtin();
        assert_eq!(reg.len(), BUILTINS.len());
        for spec in BUILTINS {
            assert_eq!(normalize(spec.key), spec.key);
        }
    }

    #[test]
    fn two_cells_side_by_side() {
        let grid = Grid::new(2, 1, [], Some(Coord::new(0, 0)), Some(Coord::new(1, 0))).unwrap();
        let reg = seeded_registry();
        for key in reg.keys() {
            let algo = reg.create(key).unwrap();
            assert_eq!(
                algo.find_path(&grid).unwrap(),
                vec![Coord::new(0, 0), Coord::new(1, 0)],
                "{key}"
            );
        }
    }

    #[test]
    fn wall_between_start_and_goal() {
        let grid = Grid::new(
            3,
            1,
            [Coord::new(1, 0)],
            Some(Coord::new(0, 0)),
            Some(Coord::new(2, 0)),
        )
        .unwrap();
        let reg = Registry::builtin();
        for key in DETERMINISTIC {
            let algo = reg.create(key).unwrap();
            let outcome = algo.steps(&grid).unwrap().finish().unwrap();
            assert_eq!(outcome.status, SearchStatus::NoPath, "{key}");
            assert!(outcome.path.is_empty(), "{key}");
        }
    }

    #[test]
    fn optimal_algorithms_agree() {
        let reg = Registry::builtin();
        for layout in LAYOUTS {
            let grid = fixture(layout);
            let bfs = reg.create("bfs").unwrap().find_path(&grid).unwrap();
            for key in ["dijkstra", "astar", "dstarlite", "bellmanford"] {
                let path = reg.create(key).unwrap().find_path(&grid).unwrap();
                assert_eq!(path.len(), bfs.len(), "{key} on\n{layout}");
            }
            let astar = reg.create("astar").unwrap().find_path(&grid).unwrap();
            for key in ["wastar", "greedy", "dfs"] {
                let path = reg.create(key).unwrap().find_path(&grid).unwrap();
                assert_eq!(path.is_empty(), astar.is_empty(), "{key} on\n{layout}");
                assert!(path.len() >= astar.len(), "{key} on\n{layout}");
            }
        }
    }

    #[test]
    fn snapshot_invariants_hold_everywhere() {
        let reg = seeded_registry();
        for layout in LAYOUTS {
            let grid = fixture(layout);
            for key in reg.keys() {
                let steps = collect_steps(&reg.create(key).unwrap(), &grid);
                assert_step_invariants(&steps);
                if key != "genetic" {
                    assert_closed_monotonic(&steps);
                }
                let last = steps.last().unwrap();
                if last.status == SearchStatus::Found {
                    assert_valid_path(&grid, last.best_path.as_deref().unwrap());
                }
                if key != "genetic" {
                    let expected = if reg.create("bfs").unwrap().find_path(&grid).unwrap().is_empty() {
                        SearchStatus::NoPath
                    } else {
                        SearchStatus::Found
                    };
                    assert_eq!(final_status(&steps), Some(expected), "{key} on\n{layout}");
                }
            }
        }
    }

    #[test]
    fn snapshots_are_deterministic() {
        let reg = seeded_registry();
        let grid = fixture(LAYOUTS[4]);
        for key in reg.keys() {
            let a = collect_steps(&reg.create(key).unwrap(), &grid);
            let b = collect_steps(&reg.create(key).unwrap(), &grid);
            assert_eq!(a, b, "{key}");
        }
    }

    #[test]
    fn closed_set_is_sorted() {
        let reg = seeded_registry();
        let grid = fixture(LAYOUTS[5]);
        for key in reg.keys() {
            for step in collect_steps(&reg.create(key).unwrap(), &grid) {
                assert!(step.closed_set.windows(2).all(|w| w[0] < w[1]), "{key}");
            }
        }
    }

    #[test]
    fn missing_endpoints_fail_before_any_work() {
        let reg = Registry::builtin();
        let no_goal = Grid::new(3, 3, [], Some(Coord::new(0, 0)), None).unwrap();
        let no_start = Grid::new(3, 3, [], None, Some(Coord::new(2, 2))).unwrap();
        for key in reg.keys() {
            let algo = reg.create(key).unwrap();
            assert!(matches!(
                algo.steps(&no_goal),
                Err(SearchError::InvalidArgument { missing: "goal", .. })
            ));
            assert!(matches!(
                algo.find_path(&no_start),
                Err(SearchError::InvalidArgument { missing: "start", .. })
            ));
        }
    }

    #[test]
    fn steps_stop_after_terminal() {
        let reg = Registry::builtin();
        let grid = fixture(LAYOUTS[0]);
        let mut steps = reg.create("astar").unwrap().steps(&grid).unwrap();
        while steps.next().is_some() {}
        assert!(steps.is_finished());
        assert!(steps.next().is_none());
    }
}
