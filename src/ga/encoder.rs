//! Bijective codec between a finite symbol domain and fixed-width bitstrings.
//!
//! Each symbol is encoded as the zero-padded binary form of its index in the
//! domain. With the minimal width every code is assigned only when the domain
//! size is a power of two; the remaining code points (and all headroom added
//! by [`Encoder::with_bit_width`]) decode to [`GaError::UnknownBitstring`].

use super::bits::BitString;
use super::types::Symbol;
use crate::error::{GaError, Result};
use rand::Rng;
use std::collections::HashMap;

/// Widest code an encoder will use.
pub const MAX_BIT_WIDTH: usize = 32;

/// Shared, immutable codec for one symbol domain.
///
/// Encoders are typically wrapped in an `Arc` and referenced by many genes.
///
/// # Examples
///
/// ```
/// use u_genepool::ga::Encoder;
///
/// let ops = Encoder::new(vec!['+', '-', '*', '/']).unwrap();
/// assert_eq!(ops.bit_width(), 2);
/// let code = ops.encode(&'*').unwrap();
/// assert_eq!(code.to_string(), "10");
/// assert_eq!(ops.decode(&code).unwrap(), &'*');
/// ```
#[derive(Debug, Clone)]
pub struct Encoder<T: Symbol> {
    values: Vec<T>,
    index: HashMap<T, usize>,
    bit_width: usize,
}

impl<T: Symbol> Encoder<T> {
    /// Builds an encoder with the minimal width, `ceil(log2(n))` (at least 1).
    ///
    /// Fails on an empty or duplicate-bearing domain.
    pub fn new(values: Vec<T>) -> Result<Self> {
        let width = minimal_width(values.len());
        Self::with_bit_width(values, width)
    }

    /// Builds an encoder with an explicit width, leaving headroom codes unassigned.
    ///
    /// Fails if `bit_width` cannot represent every value or exceeds
    /// [`MAX_BIT_WIDTH`].
    pub fn with_bit_width(values: Vec<T>, bit_width: usize) -> Result<Self> {
        if values.is_empty() {
            return Err(GaError::Config("encoder value domain is empty".into()));
        }
        let min = minimal_width(values.len());
        if bit_width < min {
            return Err(GaError::Config(format!(
                "bit width {bit_width} cannot represent {} values (need {min})",
                values.len()
            )));
        }
        if bit_width > MAX_BIT_WIDTH {
            return Err(GaError::Config(format!(
                "bit width {bit_width} exceeds maximum of {MAX_BIT_WIDTH}"
            )));
        }

        let mut index = HashMap::with_capacity(values.len());
        for (i, v) in values.iter().enumerate() {
            if index.insert(v.clone(), i).is_some() {
                return Err(GaError::DuplicateValue(v.to_string()));
            }
        }

        Ok(Self {
            values,
            index,
            bit_width,
        })
    }

    /// The ordered symbol domain.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Width of every code produced by this encoder.
    pub fn bit_width(&self) -> usize {
        self.bit_width
    }

    /// Number of symbols in the domain.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`: construction rejects empty domains.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `value` belongs to the domain.
    pub fn contains(&self, value: &T) -> bool {
        self.index.contains_key(value)
    }

    /// Encodes a domain member.
    pub fn encode(&self, value: &T) -> Result<BitString> {
        self.index
            .get(value)
            .map(|&i| BitString::from_index(i, self.bit_width))
            .ok_or_else(|| GaError::UnknownValue(value.to_string()))
    }

    /// Decodes a code back to its symbol.
    ///
    /// Wrong-width input and unassigned codes are both rejected.
    pub fn decode(&self, bits: &BitString) -> Result<&T> {
        if bits.len() != self.bit_width {
            return Err(GaError::UnknownBitstring(format!(
                "{bits} has width {}, encoder width is {}",
                bits.len(),
                self.bit_width
            )));
        }
        bits.to_index()
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| GaError::UnknownBitstring(bits.to_string()))
    }

    /// Uniformly random domain member.
    pub fn random_value<R: Rng>(&self, rng: &mut R) -> &T {
        &self.values[rng.random_range(0..self.values.len())]
    }

    /// Code of a uniformly random domain member.
    ///
    /// Never produces an unassigned code.
    pub fn random_bitstring<R: Rng>(&self, rng: &mut R) -> BitString {
        BitString::from_index(rng.random_range(0..self.values.len()), self.bit_width)
    }
}

/// Smallest width that gives every one of `n` values a distinct code.
fn minimal_width(n: usize) -> usize {
    if n <= 2 {
        1
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn digits() -> Encoder<char> {
        Encoder::new("0123456789".chars().collect()).unwrap()
    }

    #[test]
    fn test_minimal_width() {
        assert_eq!(minimal_width(1), 1);
        assert_eq!(minimal_width(2), 1);
        assert_eq!(minimal_width(3), 2);
        assert_eq!(minimal_width(4), 2);
        assert_eq!(minimal_width(5), 3);
        assert_eq!(minimal_width(10), 4);
        assert_eq!(minimal_width(14), 4);
        assert_eq!(minimal_width(16), 4);
        assert_eq!(minimal_width(17), 5);
    }

    #[test]
    fn test_round_trip_every_value() {
        let enc = digits();
        assert_eq!(enc.bit_width(), 4);
        for v in enc.values() {
            let code = enc.encode(v).unwrap();
            assert_eq!(code.len(), 4);
            assert_eq!(enc.decode(&code).unwrap(), v);
        }
    }

    #[test]
    fn test_codes_are_index_binary() {
        let enc = digits();
        assert_eq!(enc.encode(&'0').unwrap().to_string(), "0000");
        assert_eq!(enc.encode(&'9').unwrap().to_string(), "1001");
    }

    #[test]
    fn test_random_bitstring_round_trips() {
        let enc = digits();
        let mut rng = create_rng(42);
        for _ in 0..500 {
            let code = enc.random_bitstring(&mut rng);
            let v = enc.decode(&code).unwrap();
            assert_eq!(enc.encode(v).unwrap(), code);
        }
    }

    #[test]
    fn test_random_value_covers_domain() {
        let enc = Encoder::new(vec!['+', '-', '*', '/']).unwrap();
        let mut rng = create_rng(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(*enc.random_value(&mut rng));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_unassigned_code_rejected() {
        let enc = digits();
        let err = enc.decode(&"1111".parse().unwrap()).unwrap_err();
        assert!(matches!(err, GaError::UnknownBitstring(_)));
        assert!(enc.decode(&"1010".parse().unwrap()).is_err());
    }

    #[test]
    fn test_wrong_width_rejected() {
        let enc = digits();
        assert!(enc.decode(&"001".parse().unwrap()).is_err());
        assert!(enc.decode(&"00001".parse().unwrap()).is_err());
    }

    #[test]
    fn test_unknown_value_rejected() {
        let enc = digits();
        assert_eq!(enc.encode(&'x'), Err(GaError::UnknownValue("x".into())));
    }

    #[test]
    fn test_width_override_leaves_headroom_invalid() {
        let enc = Encoder::with_bit_width(vec!['+', '-', '*', '/'], 4).unwrap();
        assert_eq!(enc.bit_width(), 4);
        assert_eq!(enc.encode(&'/').unwrap().to_string(), "0011");
        assert!(enc.decode(&"0100".parse().unwrap()).is_err());
        assert!(enc.decode(&"1111".parse().unwrap()).is_err());
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(
            Encoder::<char>::new(vec![]),
            Err(GaError::Config(_))
        ));
        assert_eq!(
            Encoder::new(vec!['a', 'b', 'a']).unwrap_err(),
            GaError::DuplicateValue("a".into())
        );
        assert!(Encoder::with_bit_width(vec!['a', 'b', 'c'], 1).is_err());
        assert!(Encoder::with_bit_width(vec!['a'], MAX_BIT_WIDTH + 1).is_err());
    }

    #[test]
    fn test_single_value_domain() {
        let enc = Encoder::new(vec!["only"]).unwrap();
        assert_eq!(enc.bit_width(), 1);
        assert_eq!(enc.decode(&"0".parse().unwrap()).unwrap(), &"only");
        assert!(enc.decode(&"1".parse().unwrap()).is_err());
    }
}
