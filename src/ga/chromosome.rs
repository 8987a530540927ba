//! Chromosomes: a genome plus evolutionary bookkeeping.
//!
//! Besides the genome, a chromosome tracks its age, its per-bit mutation
//! rate, a cached fitness, and a lazily built similarity mask. The mask
//! marks "don't-care" bits: OR-ing it onto the encoded bits yields the
//! [`masked`](Chromosome::masked) key the pool uses to reject near-duplicates.

use super::bits::BitString;
use super::encoder::Encoder;
use super::genome::Genome;
use super::types::Symbol;
use crate::error::{GaError, Result};
use rand::seq::index;
use rand::Rng;
use std::ops::Range;
use std::sync::Arc;

/// How a chromosome draws its similarity mask.
///
/// | `entire_features` | `force_percentage` | mask |
/// |---|---|---|
/// | `false` | `false` | each bit set with probability `percentage` |
/// | `false` | `true`  | exactly `ceil(bits * percentage)` bits set |
/// | `true`  | `true`  | exactly `ceil(genes * percentage)` whole genes set |
/// | `true`  | `false` | each whole gene set with probability `percentage` |
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaskPolicy {
    /// Target share of masked bits or genes (0.0–1.0).
    pub percentage: f64,

    /// Mask an exact count instead of sampling each position independently.
    pub force_percentage: bool,

    /// Mask whole genes instead of individual bits.
    pub entire_features: bool,
}

impl Default for MaskPolicy {
    fn default() -> Self {
        Self {
            percentage: 0.33,
            force_percentage: false,
            entire_features: false,
        }
    }
}

impl MaskPolicy {
    /// Rejects a percentage outside `[0, 1]`, NaN included.
    pub fn validate(&self) -> Result<()> {
        check_rate("mask percentage", self.percentage)
    }

    /// Draws a mask over a genome with the given gene spans.
    ///
    /// An out-of-range percentage masks nothing; chromosomes never hold one,
    /// since construction runs [`validate`](Self::validate).
    pub fn generate<R: Rng>(&self, spans: &[Range<usize>], rng: &mut R) -> BitString {
        let width = spans.last().map_or(0, |s| s.end);
        let p = if (0.0..=1.0).contains(&self.percentage) {
            self.percentage
        } else {
            0.0
        };
        let mut mask = BitString::zeros(width);

        match (self.entire_features, self.force_percentage) {
            (false, false) => {
                for i in 0..width {
                    mask.set(i, rng.random_bool(p));
                }
            }
            (false, true) => {
                for i in index::sample(rng, width, exact_count(width, p)) {
                    mask.set(i, true);
                }
            }
            (true, true) => {
                for g in index::sample(rng, spans.len(), exact_count(spans.len(), p)) {
                    for i in spans[g].clone() {
                        mask.set(i, true);
                    }
                }
            }
            (true, false) => {
                for span in spans {
                    if rng.random_bool(p) {
                        for i in span.clone() {
                            mask.set(i, true);
                        }
                    }
                }
            }
        }
        mask
    }
}

fn exact_count(n: usize, p: f64) -> usize {
    ((n as f64 * p).ceil() as usize).min(n)
}

/// A candidate solution.
#[derive(Debug, Clone)]
pub struct Chromosome<T: Symbol> {
    genome: Genome<T>,
    age: usize,
    mutation_rate: f64,
    mask_policy: MaskPolicy,
    mask: Option<BitString>,
    fitness: Option<f64>,
}

impl<T: Symbol> Chromosome<T> {
    /// A random chromosome over the given gene sequence.
    ///
    /// Fails on an empty gene sequence, a mutation rate outside `[0, 1]`,
    /// or an invalid mask policy.
    pub fn new<R: Rng>(
        encoders: &[Arc<Encoder<T>>],
        mutation_rate: f64,
        mask_policy: MaskPolicy,
        rng: &mut R,
    ) -> Result<Self> {
        check_topology(encoders)?;
        check_rate("mutation rate", mutation_rate)?;
        mask_policy.validate()?;
        Ok(Self::from_genome(
            Genome::random(encoders, rng),
            mutation_rate,
            mask_policy,
        ))
    }

    /// A chromosome over the given gene sequence holding `bits`.
    pub fn with_bits(
        encoders: &[Arc<Encoder<T>>],
        bits: &BitString,
        mutation_rate: f64,
        mask_policy: MaskPolicy,
    ) -> Result<Self> {
        check_topology(encoders)?;
        check_rate("mutation rate", mutation_rate)?;
        mask_policy.validate()?;
        Ok(Self::from_genome(
            Genome::from_bits(encoders, bits)?,
            mutation_rate,
            mask_policy,
        ))
    }

    fn from_genome(genome: Genome<T>, mutation_rate: f64, mask_policy: MaskPolicy) -> Self {
        Self {
            genome,
            age: 0,
            mutation_rate,
            mask_policy,
            mask: None,
            fitness: None,
        }
    }

    /// The underlying genome.
    pub fn genome(&self) -> &Genome<T> {
        &self.genome
    }

    /// Total width in bits.
    pub fn len(&self) -> usize {
        self.genome.len()
    }

    /// Always `false`: construction rejects empty gene sequences.
    pub fn is_empty(&self) -> bool {
        self.genome.is_empty()
    }

    /// Full encoded bitstring.
    pub fn encoded(&self) -> BitString {
        self.genome.encoded()
    }

    /// Full decoded string.
    pub fn decoded(&self) -> Result<String> {
        self.genome.decoded()
    }

    /// Generations survived with unchanged content.
    pub fn age(&self) -> usize {
        self.age
    }

    pub(crate) fn set_age(&mut self, age: usize) {
        self.age = age;
    }

    /// Per-bit flip probability used by [`mutate`](Self::mutate).
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// The mask generation policy.
    pub fn mask_policy(&self) -> MaskPolicy {
        self.mask_policy
    }

    /// Cached fitness, set by the pool after evaluation.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub(crate) fn set_fitness(&mut self, fitness: Option<f64>) {
        self.fitness = fitness;
    }

    /// Genome validity: every gene holds a domain member.
    ///
    /// Domain constraints live in [`Problem::is_valid`](super::Problem::is_valid).
    pub fn is_valid(&self) -> bool {
        self.genome.is_valid()
    }

    /// Replaces the content with new raw bits.
    ///
    /// Resets age, cached fitness, and mask.
    pub fn set_bitstring(&mut self, bits: &BitString) -> Result<()> {
        self.genome.set_encoded(bits)?;
        self.content_changed();
        Ok(())
    }

    /// Replaces the content with new decoded values.
    pub fn set_decoded(&mut self, values: &[T]) -> Result<()> {
        self.genome.set_decoded(values)?;
        self.content_changed();
        Ok(())
    }

    /// Resamples every gene.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        self.genome.randomize(rng);
        self.content_changed();
    }

    /// Flips each bit independently with probability `mutation_rate`.
    ///
    /// Returns the number of flipped bits. Nothing is reset when no bit flips.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R) -> usize {
        let mut bits = self.encoded();
        let mut flipped = 0;
        for i in 0..bits.len() {
            if rng.random_bool(self.mutation_rate) {
                bits.flip(i);
                flipped += 1;
            }
        }
        if flipped > 0 {
            let encoders = self.genome.encoders();
            // Same topology, same width: rebuilding cannot fail.
            if let Ok(genome) = Genome::from_bits(&encoders, &bits) {
                self.genome = genome;
            }
            self.content_changed();
        }
        flipped
    }

    fn content_changed(&mut self) {
        self.age = 0;
        self.fitness = None;
        self.mask = None;
    }

    /// The similarity mask, drawing it on first use.
    pub fn mask<R: Rng>(&mut self, rng: &mut R) -> &BitString {
        let spans = self.genome.gene_spans();
        let policy = self.mask_policy;
        self.mask.get_or_insert_with(|| policy.generate(&spans, rng))
    }

    /// The mask, if one has been drawn or installed.
    pub fn current_mask(&self) -> Option<&BitString> {
        self.mask.as_ref()
    }

    /// Installs an explicit mask.
    pub fn set_mask(&mut self, mask: BitString) -> Result<()> {
        if mask.len() != self.len() {
            return Err(GaError::WidthMismatch {
                expected: self.len(),
                actual: mask.len(),
            });
        }
        self.mask = Some(mask);
        Ok(())
    }

    /// Drops the cached mask so the next [`mask`](Self::mask) call redraws it.
    pub fn invalidate_mask(&mut self) {
        self.mask = None;
    }

    /// Encoded bits OR-ed with this chromosome's own mask.
    pub fn masked<R: Rng>(&mut self, rng: &mut R) -> BitString {
        let width = self.len();
        let encoded = self.encoded();
        encoded.or(self.mask(rng)).left_padded(width)
    }

    /// Encoded bits OR-ed with an external mask.
    ///
    /// A shorter mask is left-padded with zeros; a wider one is rejected.
    pub fn masked_with(&self, mask: &BitString) -> Result<BitString> {
        if mask.len() > self.len() {
            return Err(GaError::WidthMismatch {
                expected: self.len(),
                actual: mask.len(),
            });
        }
        Ok(self.encoded().or(mask).left_padded(self.len()))
    }
}

fn check_topology<T: Symbol>(encoders: &[Arc<Encoder<T>>]) -> Result<()> {
    if encoders.is_empty() {
        return Err(GaError::Config("gene sequence is empty".into()));
    }
    Ok(())
}

fn check_rate(name: &str, rate: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(GaError::Config(format!("{name} must lie in [0, 1]")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn formula_topology() -> Vec<Arc<Encoder<char>>> {
        let number = Arc::new(Encoder::new("0123456789".chars().collect()).unwrap());
        let operator = Arc::new(Encoder::new(vec!['+', '-', '*', '/']).unwrap());
        let mut encoders = vec![Arc::clone(&number)];
        for _ in 0..4 {
            encoders.push(Arc::clone(&operator));
            encoders.push(Arc::clone(&number));
        }
        encoders
    }

    fn bs(s: &str) -> BitString {
        s.parse().unwrap()
    }

    fn chromosome(bits: &str) -> Chromosome<char> {
        Chromosome::with_bits(&formula_topology(), &bs(bits), 0.001, MaskPolicy::default())
            .unwrap()
    }

    #[test]
    fn test_random_chromosome() {
        let mut rng = create_rng(42);
        let mut c =
            Chromosome::new(&formula_topology(), 0.01, MaskPolicy::default(), &mut rng).unwrap();
        c.randomize(&mut rng);
        assert!(c.is_valid());
        assert_eq!(c.encoded().len(), 28);
        assert_eq!(c.decoded().unwrap().len(), 9);
    }

    #[test]
    fn test_empty_gene_sequence_rejected() {
        let mut rng = create_rng(42);
        let err = Chromosome::<char>::new(&[], 0.01, MaskPolicy::default(), &mut rng).unwrap_err();
        assert!(matches!(err, GaError::Config(_)));
    }

    #[test]
    fn test_swap_bitstring() {
        let mut c = chromosome("0000001001110001100100000110");
        assert_eq!(c.encoded().to_string(), "0000001001110001100100000110");
        assert!(c.is_valid());

        c.set_bitstring(&bs("1111111111111111111111111111")).unwrap();
        assert!(!c.is_valid());

        assert!(c.set_bitstring(&bs("0101")).is_err());
    }

    #[test]
    fn test_own_mask_is_cached_and_used() {
        let mut rng = create_rng(42);
        let mut c = chromosome("0000001001110001100100000110");
        let masked = c.masked(&mut rng);
        let mask = c.mask(&mut rng).clone();

        assert_eq!(c.masked(&mut rng), masked);
        assert_eq!(mask.len(), 28);
        assert_eq!(masked, c.encoded().or(&mask));
    }

    #[test]
    fn test_external_mask() {
        let c1 = chromosome("0001001001110011000100000110");
        let c2 = chromosome("0010001001110001100101000100");
        let mask = bs("0011000000000010100001000010");

        let m1 = c1.masked_with(&mask).unwrap();
        let m2 = c2.masked_with(&mask).unwrap();
        assert_eq!(m1.to_string(), "0011001001110011100101000110");
        assert_eq!(m2.to_string(), "0011001001110011100101000110");
        assert_eq!(m1, m2);

        assert!(c1.masked_with(&BitString::zeros(29)).is_err());
    }

    #[test]
    fn test_short_external_mask_left_padded() {
        let c = chromosome("0000001001110001100100000110");
        let masked = c.masked_with(&bs("1")).unwrap();
        assert_eq!(masked.to_string(), "0000001001110001100100000111");
    }

    #[test]
    fn test_per_bit_mask_coverage() {
        let spans = vec![0..1000];
        let mut rng = create_rng(42);
        let mask = MaskPolicy::default().generate(&spans, &mut rng);
        let share = mask.count_ones() as f64 / 1000.0;
        assert!(share >= 0.2, "mask share {share}");
        assert!(share <= 0.45, "mask share {share}");
    }

    #[test]
    fn test_forced_bit_mask_exact_count() {
        let policy = MaskPolicy {
            force_percentage: true,
            ..MaskPolicy::default()
        };
        let mut rng = create_rng(3);
        let mut c = chromosome("0000001001110001100100000110");
        c.mask_policy = policy;
        assert_eq!(c.mask(&mut rng).count_ones(), 10);
    }

    #[test]
    fn test_whole_gene_mask() {
        let policy = MaskPolicy {
            percentage: 0.33,
            force_percentage: true,
            entire_features: true,
        };
        let mut rng = create_rng(11);
        let c = chromosome("0000001001110001100100000110");
        let spans = c.genome().gene_spans();
        for _ in 0..20 {
            let mask = policy.generate(&spans, &mut rng);
            let full: Vec<bool> = spans
                .iter()
                .map(|s| {
                    let ones = s.clone().filter(|&i| mask.get(i) == Some(true)).count();
                    assert!(ones == 0 || ones == s.len(), "partial gene mask {mask}");
                    ones == s.len()
                })
                .collect();
            // ceil(9 * 0.33) = 3
            assert_eq!(full.iter().filter(|&&f| f).count(), 3);
        }
    }

    #[test]
    fn test_whole_gene_bernoulli_mask() {
        let policy = MaskPolicy {
            percentage: 0.5,
            force_percentage: false,
            entire_features: true,
        };
        let spans: Vec<Range<usize>> = (0..200).map(|g| g * 3..g * 3 + 3).collect();
        let mut rng = create_rng(17);
        let mask = policy.generate(&spans, &mut rng);
        assert_eq!(mask.len(), 600);

        let mut full = 0;
        for s in &spans {
            let ones = s.clone().filter(|&i| mask.get(i) == Some(true)).count();
            assert!(ones == 0 || ones == s.len(), "partial gene mask {mask}");
            if ones == s.len() {
                full += 1;
            }
        }
        // Binomial(200, 0.5): not an exact count.
        assert!((70..=130).contains(&full), "masked genes {full}");
    }

    #[test]
    fn test_out_of_range_rates_rejected() {
        let mut rng = create_rng(42);
        for rate in [f64::NAN, -0.1, 1.5] {
            let err =
                Chromosome::new(&formula_topology(), rate, MaskPolicy::default(), &mut rng)
                    .unwrap_err();
            assert!(matches!(err, GaError::Config(_)), "rate {rate}");

            let policy = MaskPolicy {
                percentage: rate,
                ..MaskPolicy::default()
            };
            assert!(policy.validate().is_err());
            let err = Chromosome::with_bits(
                &formula_topology(),
                &bs("0000001001110001100100000110"),
                0.01,
                policy,
            )
            .unwrap_err();
            assert!(matches!(err, GaError::Config(_)), "percentage {rate}");
            assert_eq!(policy.generate(&[0..16], &mut rng).count_ones(), 0);
        }
    }

    #[test]
    fn test_zero_percentage_mask_is_empty() {
        let policy = MaskPolicy {
            percentage: 0.0,
            ..MaskPolicy::default()
        };
        let mut rng = create_rng(1);
        assert_eq!(policy.generate(&[0..16], &mut rng).count_ones(), 0);
    }

    #[test]
    fn test_set_mask_width_checked() {
        let mut c = chromosome("0000001001110001100100000110");
        assert!(c.set_mask(BitString::zeros(27)).is_err());
        c.set_mask(BitString::zeros(28)).unwrap();
        assert_eq!(c.current_mask(), Some(&BitString::zeros(28)));
        c.invalidate_mask();
        assert!(c.current_mask().is_none());
    }

    #[test]
    fn test_mutation_rate_sanity() {
        let topology: Vec<_> = (0..2500)
            .map(|_| Arc::new(Encoder::new(vec![0u8, 1, 2, 3]).unwrap()))
            .collect();
        let mut rng = create_rng(42);
        let mut c = Chromosome::new(&topology, 0.1, MaskPolicy::default(), &mut rng).unwrap();
        let before = c.encoded();
        let flipped = c.mutate(&mut rng);
        let after = c.encoded();

        assert_eq!(after.len(), 5000);
        assert_eq!(before.hamming(&after), flipped);
        let rate = flipped as f64 / 5000.0;
        assert!((rate - 0.1).abs() < 0.02, "observed flip rate {rate}");
    }

    #[test]
    fn test_mutation_resets_bookkeeping() {
        let mut rng = create_rng(42);
        let mut c = Chromosome::with_bits(
            &formula_topology(),
            &bs("0000001001110001100100000110"),
            1.0,
            MaskPolicy::default(),
        )
        .unwrap();
        c.set_age(4);
        c.set_fitness(Some(1.0));
        c.mask(&mut rng);

        assert_eq!(c.mutate(&mut rng), 28);
        assert_eq!(c.encoded().to_string(), "1111110110001110011011111001");
        assert_eq!(c.age(), 0);
        assert!(c.fitness().is_none());
        assert!(c.current_mask().is_none());
    }

    #[test]
    fn test_zero_rate_mutation_is_noop() {
        let mut rng = create_rng(42);
        let mut c = Chromosome::with_bits(
            &formula_topology(),
            &bs("0000001001110001100100000110"),
            0.0,
            MaskPolicy::default(),
        )
        .unwrap();
        c.set_age(2);
        assert_eq!(c.mutate(&mut rng), 0);
        assert_eq!(c.age(), 2);
    }
}
