use std::cmp::Ordering;
use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use sapf_core::{Coord, Grid};

use crate::cells::CellSet;
use crate::config::GeneticConfig;
use crate::error::SearchError;
use crate::step::{Expand, SearchStatus, SearchStep, Steps};
use crate::traits::{PathFinder, endpoints};

/// A single gene: one unit move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Coordinate delta of the move (y grows downward).
    pub fn delta(self) -> Coord {
        match self {
            Move::Up => Coord::new(0, -1),
            Move::Down => Coord::new(0, 1),
            Move::Left => Coord::new(-1, 0),
            Move::Right => Coord::new(1, 0),
        }
    }

    fn random(rng: &mut StdRng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Evolutionary search over fixed-length move sequences.
///
/// Each generation is one snapshot. Randomness comes from a seeded
/// [`StdRng`]; with [`GeneticConfig::seed`] unset a seed is drawn per run
/// and logged at debug level.
#[derive(Debug, Clone, Default)]
pub struct GeneticAlgorithm {
    config: GeneticConfig,
}

impl GeneticAlgorithm {
    pub fn new(config: GeneticConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneticConfig {
        &self.config
    }
}

impl PathFinder for GeneticAlgorithm {
    fn name(&self) -> &'static str {
        "Genetic Algorithm"
    }

    fn steps<'g>(&self, grid: &'g Grid) -> Result<Steps<'g>, SearchError> {
        let (start, goal) = endpoints(grid, self.name())?;
        if start == goal {
            return Ok(Steps::trivial(self.name(), start));
        }
        let seed = self.config.seed.unwrap_or_else(rand::random::<u64>);
        log::debug!("{}: seed {seed}", self.name());
        Ok(Steps::new(
            self.name(),
            Evolution::new(grid, &self.config, start, goal, seed),
        ))
    }
}

#[derive(Debug, Clone)]
struct Individual {
    genes: Vec<Move>,
    path: Vec<Coord>,
    fitness: f64,
    reached_goal: bool,
    hit_obstacle: bool,
}

impl Individual {
    /// Walk `genes` from `start`, stopping at the first move that leaves the
    /// free cells or on reaching `goal`, then score the walk.
    fn decode(grid: &Grid, start: Coord, goal: Coord, genes: Vec<Move>) -> Self {
        let mut path = vec![start];
        let mut current = start;
        let mut reached_goal = false;
        let mut hit_obstacle = false;
        for m in &genes {
            let next = current + m.delta();
            if !grid.is_free(next) {
                hit_obstacle = true;
                break;
            }
            current = next;
            path.push(current);
            if current == goal {
                reached_goal = true;
                break;
            }
        }

        let fitness = if reached_goal {
            1000.0 - path.len() as f64
        } else {
            let d = f64::from(current.manhattan(goal));
            let f = 1.0 / (d * d + 1.0);
            if hit_obstacle { f * 0.1 } else { f }
        };

        Self {
            genes,
            path,
            fitness,
            reached_goal,
            hit_obstacle,
        }
    }

    fn head(&self) -> Coord {
        self.path.last().copied().unwrap_or_default()
    }
}

fn by_fitness_desc(a: &Individual, b: &Individual) -> Ordering {
    b.fitness.total_cmp(&a.fitness)
}

struct Evolution<'g> {
    grid: &'g Grid,
    config: GeneticConfig,
    start: Coord,
    goal: Coord,
    rng: StdRng,
    gene_len: usize,
    population: Vec<Individual>,
    generation: usize,
    // Shortest goal-reaching path seen so far.
    best_goal_path: Option<Vec<Coord>>,
    best_fitness: f64,
    stalled: usize,
    explored: BTreeSet<Coord>,
}

impl<'g> Evolution<'g> {
    fn new(grid: &'g Grid, config: &GeneticConfig, start: Coord, goal: Coord, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let gene_len = config.chromosome_len(start.manhattan(goal));
        let size = config.population_size.max(1);
        let population = (0..size)
            .map(|_| {
                let genes = (0..gene_len).map(|_| Move::random(&mut rng)).collect();
                Individual::decode(grid, start, goal, genes)
            })
            .collect();
        Self {
            grid,
            config: config.clone(),
            start,
            goal,
            rng,
            gene_len,
            population,
            generation: 0,
            best_goal_path: None,
            best_fitness: f64::NEG_INFINITY,
            stalled: 0,
            explored: BTreeSet::new(),
        }
    }

    /// Replace the (sorted) population with the next generation: elites are
    /// carried over, the rest are crossover children of the mating pool with
    /// per-gene mutation.
    fn breed(&mut self) {
        let size = self.population.len();
        let elite = self.config.elite_count().min(size);
        let pool = self.config.pool_size().min(size).max(1);

        let mut next: Vec<Individual> = self.population[..elite].to_vec();
        while next.len() < size {
            let p1 = &self.population[self.rng.random_range(0..pool)];
            let p2 = &self.population[self.rng.random_range(0..pool)];
            let cut = self.rng.random_range(0..self.gene_len);
            let mut genes: Vec<Move> = p1.genes[..cut]
                .iter()
                .chain(&p2.genes[cut..])
                .copied()
                .collect();
            for g in genes.iter_mut() {
                if self.rng.random::<f64>() < self.config.mutation_rate {
                    *g = Move::random(&mut self.rng);
                }
            }
            next.push(Individual::decode(self.grid, self.start, self.goal, genes));
        }
        self.population = next;
    }

    /// Distinct population heads in fitness order.
    fn heads(&self) -> Vec<Coord> {
        let mut seen = CellSet::new(self.grid);
        self.population
            .iter()
            .map(Individual::head)
            .filter(|&c| seen.insert(c))
            .collect()
    }
}

impl Expand for Evolution<'_> {
    fn expand(&mut self) -> Result<SearchStep, SearchError> {
        self.population.sort_by(by_fitness_desc);
        let generation = self.generation;
        self.generation += 1;

        for ind in &self.population {
            self.explored.extend(ind.path.iter().copied());
        }

        let best = &self.population[0];
        let mut log = format!("Gen {generation}: best fitness={:.4}", best.fitness);
        if best.hit_obstacle && !best.reached_goal {
            log.push_str(" (blocked)");
        }

        if best.reached_goal {
            let shorter = self
                .best_goal_path
                .as_ref()
                .is_none_or(|p| best.path.len() < p.len());
            if shorter {
                self.best_goal_path = Some(best.path.clone());
            }
            if best.fitness > self.best_fitness {
                self.best_fitness = best.fitness;
                self.stalled = 0;
            } else {
                self.stalled += 1;
            }
        }

        let optimal_len = self.start.manhattan(self.goal) as usize + 1;
        let last_generation = self.generation >= self.config.max_generations.max(1);

        let status = match &self.best_goal_path {
            Some(path) if path.len() == optimal_len => {
                log.push_str(&format!("\nGoal reached with an optimal path of {} cells.", path.len()));
                SearchStatus::Found
            }
            Some(path) if self.stalled >= self.config.stall_generations => {
                log.push_str(&format!(
                    "\nNo improvement for {} generations. Best path has {} cells.",
                    self.stalled,
                    path.len()
                ));
                SearchStatus::Found
            }
            Some(path) if last_generation => {
                log.push_str(&format!(
                    "\nMax generations reached. Best path has {} cells.",
                    path.len()
                ));
                SearchStatus::Found
            }
            Some(path) => {
                log.push_str(&format!("\nGoal reached ({} cells). Optimizing...", path.len()));
                SearchStatus::Running
            }
            None if last_generation => {
                log::warn!(
                    "genetic search hit the generation cap ({}) without reaching the goal",
                    self.config.max_generations
                );
                log.push_str("\nMax generations reached. Goal never reached.");
                SearchStatus::NoPath
            }
            None => SearchStatus::Running,
        };

        let best_path = self
            .best_goal_path
            .clone()
            .unwrap_or_else(|| best.path.clone());
        let open_set = self.heads();

        if !status.is_terminal() {
            self.breed();
        }

        Ok(SearchStep {
            current: self.start,
            open_set,
            closed_set: self.explored.iter().copied().collect(),
            open_added: Vec::new(),
            best_path: Some(best_path),
            log,
            status,
        })
    }
}
