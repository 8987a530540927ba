//! Bit-encoded Genetic Algorithm engine.
//!
//! Candidate solutions are fixed-width bitstrings assembled from typed
//! slots. Users describe the genome topology as a sequence of shared
//! [`Encoder`]s and plug their domain in by implementing [`Problem`].
//!
//! # Layers
//!
//! - [`Encoder`]: bijective codec between a symbol domain and bitstrings
//! - [`Gene`]: one encoded slot bound to an encoder
//! - [`Genome`]: ordered genes; whole-bitstring concatenation and re-slicing
//! - [`Chromosome`]: genome plus mutation, similarity mask, age, fitness cache
//! - [`Pool`]: fixed-size population with roulette-wheel selection,
//!   one-point crossover, mutation, and masked duplicate rejection
//! - [`PoolRunner`]: outer generation loop with solution harvesting
//!
//! # Diversity preservation
//!
//! Every chromosome carries a mask of "don't-care" bits drawn according to
//! a [`MaskPolicy`]. OR-ing the mask onto the encoded bits gives an
//! approximate-equality key; the pool refuses to seed two members whose
//! keys collide.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod bits;
mod chromosome;
mod config;
mod encoder;
mod gene;
mod genome;
mod pool;
mod runner;
mod selection;
mod types;

pub use bits::BitString;
pub use chromosome::{Chromosome, MaskPolicy};
pub use config::PoolConfig;
pub use encoder::{Encoder, MAX_BIT_WIDTH};
pub use gene::Gene;
pub use genome::Genome;
pub use pool::Pool;
pub use runner::{GenerationStats, PoolRunner, RunResult};
pub use selection::RouletteWheel;
pub use types::{Problem, Symbol};
