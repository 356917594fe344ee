//! Search tunables.
//!
//! [`SearchConfig::default`] reproduces the fixed values every algorithm is
//! specified with; a [`Registry`](crate::Registry) hands its config to each
//! factory it runs.

use std::fmt;

/// Exact rational heuristic weight `num / den`.
///
/// Weighted A* orders its frontier by `den·g + num·h`, which keeps
/// priorities integral so stale-entry checks are exact comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weight {
    pub num: u32,
    pub den: u32,
}

impl Weight {
    /// Plain A*: `f = g + h`.
    pub const ONE: Self = Self { num: 1, den: 1 };

    /// `w = 1.5`.
    pub const THREE_HALVES: Self = Self { num: 3, den: 2 };

    /// Create a weight. A zero denominator is treated as 1.
    pub const fn new(num: u32, den: u32) -> Self {
        Self {
            num,
            den: if den == 0 { 1 } else { den },
        }
    }

    /// Scaled priority `den·g + num·h`.
    #[inline]
    pub const fn priority(self, g: u32, h: u32) -> u64 {
        self.den as u64 * g as u64 + self.num as u64 * h as u64
    }

    /// The weight as a float, for display only.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::THREE_HALVES
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}

/// Genetic Algorithm tunables.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeneticConfig {
    pub population_size: usize,
    /// Independent per-gene mutation probability.
    pub mutation_rate: f64,
    /// Generation cap.
    pub max_generations: usize,
    /// Chromosome length is `max(min_chromosome_len, length_factor × manhattan(start, goal))`.
    pub min_chromosome_len: usize,
    pub length_factor: usize,
    /// Share of the population copied unchanged into the next generation.
    pub elite_fraction: f64,
    /// Share of the population eligible as parents.
    pub pool_fraction: f64,
    /// Generations without fitness improvement, after the goal was first
    /// reached, before the run settles on `Found`.
    pub stall_generations: usize,
    /// RNG seed; `None` draws one from the thread RNG (and logs it).
    pub seed: Option<u64>,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            mutation_rate: 0.05,
            max_generations: 500,
            min_chromosome_len: 20,
            length_factor: 3,
            elite_fraction: 0.1,
            pool_fraction: 0.5,
            stall_generations: 50,
            seed: None,
        }
    }
}

impl GeneticConfig {
    /// Same tunables with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn chromosome_len(&self, manhattan: u32) -> usize {
        self.min_chromosome_len
            .max(self.length_factor * manhattan as usize)
            .max(1)
    }

    pub(crate) fn elite_count(&self) -> usize {
        ((self.population_size as f64 * self.elite_fraction) as usize).min(self.population_size)
    }

    pub(crate) fn pool_size(&self) -> usize {
        ((self.population_size as f64 * self.pool_fraction) as usize).clamp(1, self.population_size.max(1))
    }
}

/// Configuration shared by all algorithms of a registry.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Heuristic weight for Weighted A*.
    pub weight: Weight,
    pub genetic: GeneticConfig,
}
