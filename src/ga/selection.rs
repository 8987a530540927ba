//! Fitness-proportionate (roulette wheel) parent selection.
//!
//! The wheel is the prefix sum of each member's share of total fitness,
//! taken over the population in its current order. It is a pure function of
//! the population's fitness values, so the pool builds it once per
//! generation and reuses it for every parent draw.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use rand::Rng;

/// Cumulative selection probabilities over a population.
///
/// # Examples
///
/// ```
/// use u_genepool::ga::RouletteWheel;
///
/// let wheel = RouletteWheel::build(&[Some(1.0), Some(3.0), None]);
/// assert_eq!(wheel.cumulative(), &[0.25, 1.0, 1.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouletteWheel {
    cumulative: Vec<f64>,
}

impl RouletteWheel {
    /// Builds the wheel from per-member fitness.
    ///
    /// `None`, negative, and non-finite fitness are unevaluable and get zero
    /// weight. When no member has positive weight, the evaluable members
    /// share the wheel equally; only when none is evaluable does every
    /// member get `1 / n`.
    pub fn build(fitnesses: &[Option<f64>]) -> Self {
        let evaluable: Vec<bool> = fitnesses
            .iter()
            .map(|f| matches!(f, Some(f) if f.is_finite() && *f >= 0.0))
            .collect();
        let weights: Vec<f64> = fitnesses
            .iter()
            .zip(&evaluable)
            .map(|(f, &ok)| match f {
                Some(f) if ok => *f,
                _ => 0.0,
            })
            .collect();
        let total: f64 = weights.iter().sum();
        let n_evaluable = evaluable.iter().filter(|&&ok| ok).count();

        let shares: Vec<f64> = if total > 0.0 {
            weights.iter().map(|w| w / total).collect()
        } else if n_evaluable > 0 {
            evaluable
                .iter()
                .map(|&ok| if ok { 1.0 / n_evaluable as f64 } else { 0.0 })
                .collect()
        } else {
            vec![1.0 / fitnesses.len() as f64; fitnesses.len()]
        };

        let mut acc = 0.0;
        let mut cumulative: Vec<f64> = shares
            .iter()
            .map(|&p| {
                acc += p;
                acc
            })
            .collect();

        // Exactly 1.0 from the last member with a share onward.
        if let Some(last) = shares.iter().rposition(|&p| p > 0.0) {
            for c in &mut cumulative[last..] {
                *c = 1.0;
            }
        }

        Self { cumulative }
    }

    /// Cumulative probabilities, one per member.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Number of members on the wheel.
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Whether the wheel has no members.
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Spins the wheel: the first member whose cumulative probability is
    /// at least a uniform draw in `[0, 1)`.
    ///
    /// # Panics
    /// Panics if the wheel is empty.
    pub fn select<R: Rng>(&self, rng: &mut R) -> usize {
        assert!(!self.is_empty(), "cannot select from empty roulette wheel");

        let r: f64 = rng.random();
        self.cumulative
            .iter()
            .position(|&c| c >= r)
            .unwrap_or(self.cumulative.len() - 1) // floating-point fallback
    }
}
