//! Extension contract between the engine and a problem domain.
//!
//! The engine owns encoding, recombination, and population bookkeeping.
//! A domain plugs in by implementing [`Problem`]: a validity predicate, a
//! fitness function, and a target-reached predicate. Evaluation of the
//! decoded symbol sequence is entirely the domain's business and must be a
//! pure function of the chromosome's decoded content.

use super::chromosome::Chromosome;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Bound for symbols an [`Encoder`](super::Encoder) can carry.
///
/// Blanket-implemented for every type that satisfies the bounds, so
/// `char`, `&'static str`, `String`, and small enums all work out of the box.
pub trait Symbol: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {}

impl<T> Symbol for T where T: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {}

/// Defines a domain for the bit-encoded GA.
///
/// # Implementing
///
/// ```ignore
/// struct Parity;
///
/// impl Problem<char> for Parity {
///     fn fitness(&self, c: &Chromosome<char>) -> Option<f64> {
///         let s = c.decoded().ok()?;
///         Some(s.chars().filter(|&ch| ch == '1').count() as f64)
///     }
/// }
/// ```
///
/// # Fitness
///
/// Higher is fitter (maximization), and values must be non-negative:
/// the pool selects parents in proportion to their share of total fitness.
/// `None` marks a chromosome as not evaluable; it gets zero selection weight.
pub trait Problem<T: Symbol>: Send + Sync {
    /// Domain constraint layered on top of genome validity.
    ///
    /// The pool only accepts a chromosome when both
    /// [`Chromosome::is_valid`] and this predicate hold, so implementations
    /// need not re-check that every gene decodes. The default accepts
    /// everything.
    fn is_valid(&self, _chromosome: &Chromosome<T>) -> bool {
        true
    }

    /// Fitness of a valid chromosome. Higher is better.
    fn fitness(&self, chromosome: &Chromosome<T>) -> Option<f64>;

    /// Whether the chromosome reaches the domain's target.
    ///
    /// Used to harvest solutions across generations. The default never
    /// reports a solution.
    fn is_solution(&self, _chromosome: &Chromosome<T>) -> bool {
        false
    }

    /// Called at the end of each generation with the population's total fitness.
    ///
    /// Useful for logging or external progress reporting. The default
    /// implementation is a no-op.
    fn on_generation(&self, _generation: usize, _total_fitness: f64) {}
}
