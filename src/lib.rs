//! Bit-encoded genetic algorithm engine.
//!
//! Evolves populations of bitstring-encoded candidate solutions toward a
//! fitness objective using roulette-wheel selection, one-point crossover,
//! and per-bit mutation, with similarity masking to keep the initial
//! population from collapsing onto near-duplicates.
//!
//! - [`ga`]: encoders, genes, genomes, chromosomes, the population pool,
//!   and the generation runner.
//! - [`error`]: the crate's error taxonomy.
//! - [`random`]: seedable random number generation.
//!
//! # Architecture
//!
//! The engine is single-threaded and deterministic given a seed. The only
//! mutable external resource is the random generator, which the pool owns
//! and lends to every stochastic operation. Domain semantics (what the
//! decoded symbols mean, how fit they are) live entirely behind the
//! [`ga::Problem`] trait.

pub mod error;
pub mod ga;
pub mod random;

pub use error::{GaError, Result};
