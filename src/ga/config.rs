//! Pool configuration.
//!
//! [`PoolConfig`] holds every numeric parameter of the evolutionary loop.
//! The gene sequence (genome topology) is passed to the pool separately
//! because it carries the symbol type.

use super::chromosome::MaskPolicy;
use crate::error::{GaError, Result};

/// Configuration for a [`Pool`](super::Pool).
///
/// # Defaults
///
/// ```
/// use u_genepool::ga::PoolConfig;
///
/// let config = PoolConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.num_generations, 10);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_genepool::ga::PoolConfig;
///
/// let config = PoolConfig::default()
///     .with_population_size(200)
///     .with_crossover_rate(0.8)
///     .with_mask_percentage(0.5)
///     .with_mask_entire_features(true)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolConfig {
    /// Number of chromosomes, constant across generations.
    pub population_size: usize,

    /// Probability of one-point crossover for a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, both parents are cloned.
    pub crossover_rate: f64,

    /// Per-bit flip probability during mutation (0.0–1.0).
    pub mutation_rate: f64,

    /// Generations run by [`PoolRunner`](super::PoolRunner).
    pub num_generations: usize,

    /// Share of bits (or genes) a similarity mask covers (0.0–1.0).
    ///
    /// Higher values make more chromosomes collide as duplicates.
    pub mask_percentage: f64,

    /// Mask an exact count of positions rather than sampling each one.
    pub force_mask_percentage: bool,

    /// Mask whole genes rather than individual bits.
    pub mask_entire_features: bool,

    /// Candidate draws allowed per population fill before giving up.
    ///
    /// `None` allows `population_size * 1000`.
    pub max_attempts: Option<usize>,

    /// Stop the runner once this many solutions have been harvested.
    pub target_solutions: Option<usize>,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            crossover_rate: 0.7,
            mutation_rate: 0.001,
            num_generations: 10,
            mask_percentage: 0.33,
            force_mask_percentage: false,
            mask_entire_features: false,
            max_attempts: None,
            target_solutions: None,
            seed: None,
        }
    }
}

impl PoolConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-bit mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the number of generations.
    pub fn with_num_generations(mut self, n: usize) -> Self {
        self.num_generations = n;
        self
    }

    /// Sets the mask percentage.
    pub fn with_mask_percentage(mut self, p: f64) -> Self {
        self.mask_percentage = p.clamp(0.0, 1.0);
        self
    }

    /// Selects exact-count masking.
    pub fn with_force_mask_percentage(mut self, force: bool) -> Self {
        self.force_mask_percentage = force;
        self
    }

    /// Selects whole-gene masking.
    pub fn with_mask_entire_features(mut self, entire: bool) -> Self {
        self.mask_entire_features = entire;
        self
    }

    /// Sets the retry ceiling for filling a population.
    pub fn with_max_attempts(mut self, n: usize) -> Self {
        self.max_attempts = Some(n);
        self
    }

    /// Sets the harvested-solution count that stops the runner early.
    pub fn with_target_solutions(mut self, n: usize) -> Self {
        self.target_solutions = Some(n);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Mask policy handed to every chromosome.
    pub fn mask_policy(&self) -> MaskPolicy {
        MaskPolicy {
            percentage: self.mask_percentage,
            force_percentage: self.force_mask_percentage,
            entire_features: self.mask_entire_features,
        }
    }

    /// Effective retry ceiling.
    pub fn attempt_ceiling(&self) -> usize {
        self.max_attempts
            .unwrap_or_else(|| self.population_size.saturating_mul(1000))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(GaError::Config("population_size must be at least 1".into()));
        }
        for (name, rate) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
            ("mask_percentage", self.mask_percentage),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(GaError::Config(format!("{name} must lie in [0, 1]")));
            }
        }
        if self.max_attempts == Some(0) {
            return Err(GaError::Config("max_attempts must be positive or None".into()));
        }
        Ok(())
    }
}
