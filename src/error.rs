//! Error taxonomy for the GA engine.
//!
//! Configuration and codec errors fail fast. Stochastic invalidity of
//! offspring is never reported here: the pool discards and resamples.
//! Only when a retry ceiling is exhausted does the pool surface
//! [`GaError::Exhausted`].

use thiserror::Error;

/// Errors raised by encoders, genomes, chromosomes, and the pool.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GaError {
    /// Invalid construction parameters.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The encoder's value domain contains a repeated symbol.
    #[error("Duplicate value in encoder domain: {0}")]
    DuplicateValue(String),

    /// `encode` was given a value outside the encoder's domain.
    #[error("Unknown value: {0}")]
    UnknownValue(String),

    /// `decode` was given a bitstring with no assigned code.
    #[error("Unknown bitstring: {0}")]
    UnknownBitstring(String),

    /// A bitstring does not match the width of its topology.
    #[error("Width mismatch: expected {expected} bits, got {actual}")]
    WidthMismatch { expected: usize, actual: usize },

    /// Text that is not a sequence of `0` and `1` characters.
    #[error("Invalid bitstring literal: {0:?}")]
    InvalidBitString(String),

    /// A split index beyond the end of the bitstring.
    #[error("Split index {index} out of range for width {width}")]
    SplitOutOfRange { index: usize, width: usize },

    /// The population could not be filled within the retry ceiling.
    #[error("Population could not be {phase}: gave up after {attempts} attempts")]
    Exhausted { phase: &'static str, attempts: usize },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GaError>;
