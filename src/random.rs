//! Seedable random number generation.
//!
//! Every stochastic operation in the crate takes `&mut impl Rng`; the pool
//! owns a single generator built here so whole runs are reproducible from
//! one seed.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from an optional seed, falling back to entropy.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = create_rng(7);
        let mut b = create_rng(7);
        let xs: Vec<u32> = (0..16).map(|_| a.random()).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.random()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_optional_seed() {
        let mut a = rng_from_seed(Some(3));
        let mut b = create_rng(3);
        assert_eq!(a.random::<u64>(), b.random::<u64>());
    }
}
