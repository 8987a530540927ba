//! Generation loop orchestration.
//!
//! [`Pool::evolve`] performs exactly one generation and imposes no cap of
//! its own. [`PoolRunner`] is the outer loop: it seeds the pool if needed,
//! calls `evolve` up to `num_generations` times, harvests solutions after
//! every generation, and stops early on cancellation or once enough
//! solutions have been collected.

use super::chromosome::Chromosome;
use super::pool::Pool;
use super::types::{Problem, Symbol};
use crate::error::Result;
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Per-generation observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Generation number, starting at 1.
    pub generation: usize,

    /// Total fitness before the generation.
    pub old_fitness: f64,

    /// Total fitness after the generation.
    pub new_fitness: f64,

    /// Members reaching the target after the generation.
    pub solutions: usize,
}

/// Result of a [`PoolRunner`] run.
#[derive(Debug, Clone)]
pub struct RunResult<T: Symbol> {
    /// Generations actually evolved.
    pub generations: usize,

    /// Solutions present in the population before the first generation.
    pub initial_solutions: usize,

    /// Solutions harvested after every generation, in order.
    ///
    /// A chromosome that survives several generations is harvested once
    /// per generation.
    pub total_solutions: Vec<Chromosome<T>>,

    /// Fitness totals per generation.
    pub fitness_history: Vec<GenerationStats>,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Whether the run stopped because `target_solutions` was reached.
    pub reached_target: bool,
}

/// Drives a [`Pool`] through successive generations.
///
/// # Usage
///
/// ```ignore
/// let mut pool = Pool::new(encoders, PoolConfig::default().with_seed(42), MyProblem)?;
/// let result = PoolRunner::run(&mut pool)?;
/// println!("harvested {} solutions", result.total_solutions.len());
/// ```
pub struct PoolRunner;

impl PoolRunner {
    /// Runs the configured number of generations.
    pub fn run<T: Symbol, P: Problem<T>>(pool: &mut Pool<T, P>) -> Result<RunResult<T>> {
        Self::run_with_cancel(pool, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the run stops
    /// before the next generation and returns what was harvested so far.
    pub fn run_with_cancel<T: Symbol, P: Problem<T>>(
        pool: &mut Pool<T, P>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<RunResult<T>> {
        if pool.chromosomes().is_empty() {
            pool.randomize()?;
        }

        let num_generations = pool.config().num_generations;
        let target = pool.config().target_solutions;

        let mut result = RunResult {
            generations: 0,
            initial_solutions: pool.solutions().len(),
            total_solutions: Vec::new(),
            fitness_history: Vec::with_capacity(num_generations),
            cancelled: false,
            reached_target: false,
        };

        for _ in 0..num_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    result.cancelled = true;
                    break;
                }
            }

            pool.evolve()?;
            result.generations += 1;

            let solutions = pool.solutions();
            result.fitness_history.push(GenerationStats {
                generation: pool.generation(),
                old_fitness: pool.old_fitness(),
                new_fitness: pool.new_fitness(),
                solutions: solutions.len(),
            });
            result
                .total_solutions
                .extend(solutions.into_iter().cloned());

            if target.is_some_and(|t| result.total_solutions.len() >= t) {
                result.reached_target = true;
                break;
            }
        }

        info!(
            "run finished after {} generations: {} initial, {} harvested solutions",
            result.generations,
            result.initial_solutions,
            result.total_solutions.len()
        );
        Ok(result)
    }
}
