//! The population container and its generational step.
//!
//! [`Pool`] owns a fixed-size population and drives it one generation at a
//! time: roulette-wheel selection, one-point crossover applied in lock-step
//! to bits and masks, per-bit mutation, and rejection of invalid offspring.
//! Seeding additionally rejects near-duplicates by comparing masked keys.
//!
//! The population is kept sorted by fitness (ascending, unevaluable first)
//! whenever it is replaced, so the cached roulette wheel always indexes the
//! current order.

use super::bits::BitString;
use super::chromosome::Chromosome;
use super::config::PoolConfig;
use super::encoder::Encoder;
use super::selection::RouletteWheel;
use super::types::{Problem, Symbol};
use crate::error::{GaError, Result};
use crate::random::rng_from_seed;
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::cmp::Ordering;
use std::sync::Arc;

/// A population of chromosomes evolving under a [`Problem`].
///
/// # Usage
///
/// ```ignore
/// let mut pool = Pool::new(encoders, PoolConfig::default().with_seed(42), MyProblem)?;
/// pool.randomize()?;
/// for _ in 0..10 {
///     pool.evolve()?;
/// }
/// println!("solutions: {}", pool.solutions().len());
/// ```
pub struct Pool<T: Symbol, P: Problem<T>> {
    problem: P,
    gene_sequence: Vec<Arc<Encoder<T>>>,
    config: PoolConfig,
    chromosomes: Vec<Chromosome<T>>,
    wheel: Option<RouletteWheel>,
    rng: StdRng,
    generation: usize,
    old_fitness: f64,
    new_fitness: f64,
}

impl<T: Symbol, P: Problem<T>> Pool<T, P> {
    /// Creates an empty pool. Call [`randomize`](Self::randomize) to seed it.
    ///
    /// Fails on an invalid configuration or an empty gene sequence.
    pub fn new(gene_sequence: Vec<Arc<Encoder<T>>>, config: PoolConfig, problem: P) -> Result<Self> {
        config.validate()?;
        if gene_sequence.is_empty() {
            return Err(GaError::Config("gene sequence is empty".into()));
        }
        let rng = rng_from_seed(config.seed);
        Ok(Self {
            problem,
            gene_sequence,
            config,
            chromosomes: Vec::new(),
            wheel: None,
            rng,
            generation: 0,
            old_fitness: 0.0,
            new_fitness: 0.0,
        })
    }

    /// The domain.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// The configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Genome topology shared by every member.
    pub fn gene_sequence(&self) -> &[Arc<Encoder<T>>] {
        &self.gene_sequence
    }

    /// Width of every member's bitstring.
    pub fn total_width(&self) -> usize {
        self.gene_sequence.iter().map(|e| e.bit_width()).sum()
    }

    /// Current members, sorted by ascending fitness.
    pub fn chromosomes(&self) -> &[Chromosome<T>] {
        &self.chromosomes
    }

    /// Generations evolved since the last [`randomize`](Self::randomize).
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Total fitness of the population before the last generation, or
    /// `0.0` if nothing has evolved since seeding.
    pub fn old_fitness(&self) -> f64 {
        self.old_fitness
    }

    /// Total fitness of the current population.
    pub fn new_fitness(&self) -> f64 {
        self.new_fitness
    }

    /// Whether a roulette wheel is cached for the current population.
    pub fn is_wheel_cached(&self) -> bool {
        self.wheel.is_some()
    }

    /// Members that reach the domain's target.
    pub fn solutions(&self) -> Vec<&Chromosome<T>> {
        self.chromosomes
            .iter()
            .filter(|c| self.problem.is_solution(c))
            .collect()
    }

    /// The fittest member.
    pub fn best(&self) -> Option<&Chromosome<T>> {
        self.chromosomes.iter().max_by(|a, b| cmp_fitness(*a, *b))
    }

    /// Whether a chromosome passes both genome and domain validity.
    pub fn accepts(&self, chromosome: &Chromosome<T>) -> bool {
        chromosome.is_valid() && self.problem.is_valid(chromosome)
    }

    /// Draws one parent index by roulette wheel, building the wheel if needed.
    ///
    /// Returns `None` for an unseeded pool.
    pub fn select_parent(&mut self) -> Option<usize> {
        if self.chromosomes.is_empty() {
            return None;
        }
        let chromosomes = &self.chromosomes;
        let wheel = self
            .wheel
            .get_or_insert_with(|| RouletteWheel::build(&fitnesses(chromosomes)));
        Some(wheel.select(&mut self.rng))
    }

    /// Seeds the population with valid chromosomes whose masked keys are
    /// pairwise distinct.
    ///
    /// Each candidate is compared under its own freshly drawn mask. Fails
    /// with [`GaError::Exhausted`] if the retry ceiling is reached first.
    pub fn randomize(&mut self) -> Result<()> {
        let n = self.config.population_size;
        let ceiling = self.config.attempt_ceiling();
        let policy = self.config.mask_policy();

        let mut accepted: Vec<Chromosome<T>> = Vec::with_capacity(n);
        let mut keys: Vec<BitString> = Vec::with_capacity(n);
        let mut attempts = 0usize;

        while accepted.len() < n {
            if attempts >= ceiling {
                warn!(
                    "seeding gave up after {attempts} attempts with {}/{n} members",
                    accepted.len()
                );
                return Err(GaError::Exhausted {
                    phase: "seeded",
                    attempts,
                });
            }
            attempts += 1;

            let mut candidate = Chromosome::new(
                &self.gene_sequence,
                self.config.mutation_rate,
                policy,
                &mut self.rng,
            )?;
            if !self.accepts(&candidate) {
                trace!("seeding: rejected invalid candidate {}", candidate.encoded());
                continue;
            }
            let key = candidate.masked(&mut self.rng);
            if keys.contains(&key) {
                trace!("seeding: rejected duplicate key {key}");
                continue;
            }

            candidate.set_fitness(self.problem.fitness(&candidate));
            keys.push(key);
            accepted.push(candidate);
        }

        debug!("seeded {n} chromosomes in {attempts} attempts");
        self.install(accepted);
        self.generation = 0;
        self.old_fitness = 0.0;
        Ok(())
    }

    /// Runs one generational step.
    ///
    /// Parents are drawn with replacement from the roulette wheel; with
    /// probability `crossover_rate` they are recombined at a random bit in
    /// `[1, width - 2]` (masks are cut at the same point), otherwise
    /// cloned. Both children are mutated. A child whose bits still equal its
    /// source parent's keeps that parent's mask and ages by one; any other
    /// child starts at age zero. Invalid children are discarded.
    ///
    /// Fails on an unseeded pool, or with [`GaError::Exhausted`] if the
    /// retry ceiling is reached; the population is left untouched on error.
    pub fn evolve(&mut self) -> Result<()> {
        if self.chromosomes.is_empty() {
            return Err(GaError::Config(
                "pool has no population; call randomize first".into(),
            ));
        }

        let n = self.config.population_size;
        let width = self.total_width();
        let ceiling = self.config.attempt_ceiling();

        for c in &mut self.chromosomes {
            c.mask(&mut self.rng);
        }
        let wheel = match self.wheel.take() {
            Some(wheel) => wheel,
            None => RouletteWheel::build(&fitnesses(&self.chromosomes)),
        };

        let mut next: Vec<Chromosome<T>> = Vec::with_capacity(n);
        let mut attempts = 0usize;
        let mut discarded = 0usize;

        while next.len() < n {
            if attempts >= ceiling {
                warn!(
                    "generation {} gave up after {attempts} attempts with {}/{n} members",
                    self.generation + 1,
                    next.len()
                );
                self.wheel = Some(wheel);
                return Err(GaError::Exhausted {
                    phase: "evolved",
                    attempts,
                });
            }
            attempts += 1;

            let sources = [wheel.select(&mut self.rng), wheel.select(&mut self.rng)];
            let mut children = sources.map(|i| self.chromosomes[i].clone());

            if width >= 3 && self.rng.random_bool(self.config.crossover_rate) {
                let point = self.rng.random_range(1..=width - 2);
                let (a, b) = (&self.chromosomes[sources[0]], &self.chromosomes[sources[1]]);
                let (bits_a, bits_b) = cross(&a.encoded(), &b.encoded(), point)?;
                children[0].set_bitstring(&bits_a)?;
                children[1].set_bitstring(&bits_b)?;
                if let (Some(ma), Some(mb)) = (a.current_mask(), b.current_mask()) {
                    let (mask_a, mask_b) = cross(ma, mb, point)?;
                    children[0].set_mask(mask_a)?;
                    children[1].set_mask(mask_b)?;
                }
            }

            for (mut child, source) in children.into_iter().zip(sources) {
                child.mutate(&mut self.rng);

                let parent = &self.chromosomes[source];
                if child.encoded() == parent.encoded() {
                    child.set_age(parent.age() + 1);
                    child.set_fitness(parent.fitness());
                    if let Some(mask) = parent.current_mask() {
                        child.set_mask(mask.clone())?;
                    }
                } else {
                    child.set_age(0);
                    child.set_fitness(None);
                }

                if !self.accepts(&child) {
                    discarded += 1;
                    continue;
                }
                if next.len() < n {
                    if child.fitness().is_none() {
                        child.set_fitness(self.problem.fitness(&child));
                    }
                    next.push(child);
                }
            }
        }

        self.old_fitness = total_fitness(&self.chromosomes);
        self.install(next);
        self.generation += 1;

        debug!(
            "generation {}: old_fitness={:.4} new_fitness={:.4} discarded={discarded} attempts={attempts}",
            self.generation, self.old_fitness, self.new_fitness
        );
        self.problem.on_generation(self.generation, self.new_fitness);
        Ok(())
    }

    /// Replaces the population, restoring the sort order and dropping the wheel.
    fn install(&mut self, mut population: Vec<Chromosome<T>>) {
        population.sort_by(cmp_fitness);
        self.new_fitness = total_fitness(&population);
        self.chromosomes = population;
        self.wheel = None;
    }
}

/// One-point crossover of two equal-width bitstrings.
fn cross(a: &BitString, b: &BitString, point: usize) -> Result<(BitString, BitString)> {
    let (a_head, a_tail) = a.split_at(point)?;
    let (b_head, b_tail) = b.split_at(point)?;
    Ok((
        BitString::concat([&a_head, &b_tail]),
        BitString::concat([&b_head, &a_tail]),
    ))
}

fn fitnesses<T: Symbol>(chromosomes: &[Chromosome<T>]) -> Vec<Option<f64>> {
    chromosomes.iter().map(Chromosome::fitness).collect()
}

fn total_fitness<T: Symbol>(chromosomes: &[Chromosome<T>]) -> f64 {
    chromosomes.iter().filter_map(Chromosome::fitness).sum()
}

/// Ascending fitness, unevaluable members first.
fn cmp_fitness<T: Symbol>(a: &Chromosome<T>, b: &Chromosome<T>) -> Ordering {
    let key = |c: &Chromosome<T>| c.fitness().unwrap_or(f64::NEG_INFINITY);
    key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal)
}
