//! Fixed-width bitstrings.
//!
//! [`BitString`] is the common currency of the engine: encoders produce
//! them, genomes concatenate and re-slice them, and the pool splices them
//! during crossover. Bits are stored most-significant first, so the text
//! form `"0110"` reads the same way it is written.

use crate::error::{GaError, Result};
use rand::Rng;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// An ordered sequence of bits, most significant first.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitString(Vec<bool>);

impl BitString {
    /// Wraps a bit vector.
    pub fn new(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    /// All-zero bitstring of the given width.
    pub fn zeros(width: usize) -> Self {
        Self(vec![false; width])
    }

    /// Zero-padded binary representation of `index` in exactly `width` bits.
    ///
    /// Bits of `index` above `width` are dropped; callers size the width
    /// from the domain so this never truncates in practice.
    pub fn from_index(index: usize, width: usize) -> Self {
        let bits = (0..width)
            .rev()
            .map(|shift| shift < usize::BITS as usize && (index >> shift) & 1 == 1)
            .collect();
        Self(bits)
    }

    /// Uniformly random bitstring of the given width.
    pub fn random<R: Rng>(width: usize, rng: &mut R) -> Self {
        Self((0..width).map(|_| rng.random_bool(0.5)).collect())
    }

    /// Interprets the bits as an unsigned integer.
    ///
    /// Returns `None` if a set bit lies beyond what `usize` can hold.
    pub fn to_index(&self) -> Option<usize> {
        self.0.iter().try_fold(0usize, |acc, &bit| {
            acc.checked_mul(2)?.checked_add(usize::from(bit))
        })
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bitstring has zero width.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the raw bits.
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    /// Bit at position `i`, if in range.
    pub fn get(&self, i: usize) -> Option<bool> {
        self.0.get(i).copied()
    }

    /// Sets bit `i`. Out-of-range indices are ignored.
    pub fn set(&mut self, i: usize, value: bool) {
        if let Some(bit) = self.0.get_mut(i) {
            *bit = value;
        }
    }

    /// Flips bit `i`. Out-of-range indices are ignored.
    pub fn flip(&mut self, i: usize) {
        if let Some(bit) = self.0.get_mut(i) {
            *bit = !*bit;
        }
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    /// Copies out the bits in `range`.
    ///
    /// # Panics
    /// Panics if `range` is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self(self.0[range].to_vec())
    }

    /// Appends another bitstring.
    pub fn extend(&mut self, other: &BitString) {
        self.0.extend_from_slice(&other.0);
    }

    /// Concatenates bitstrings in order.
    pub fn concat<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = &'a BitString>,
    {
        let mut out = Self::default();
        for part in parts {
            out.extend(part);
        }
        out
    }

    /// Splits into `(prefix, suffix)` at bit `index`.
    ///
    /// The index need not align with any gene boundary.
    pub fn split_at(&self, index: usize) -> Result<(Self, Self)> {
        if index > self.len() {
            return Err(GaError::SplitOutOfRange {
                index,
                width: self.len(),
            });
        }
        let (left, right) = self.0.split_at(index);
        Ok((Self(left.to_vec()), Self(right.to_vec())))
    }

    /// Left-pads with zeros to `width`. Wider bitstrings are returned unchanged.
    pub fn left_padded(&self, width: usize) -> Self {
        if self.len() >= width {
            return self.clone();
        }
        let mut bits = vec![false; width - self.len()];
        bits.extend_from_slice(&self.0);
        Self(bits)
    }

    /// Bitwise OR, right-aligned as integers would be.
    ///
    /// The shorter operand is left-padded with zeros, so the result has the
    /// width of the wider one.
    pub fn or(&self, other: &BitString) -> Self {
        let width = self.len().max(other.len());
        let a = self.left_padded(width);
        let b = other.left_padded(width);
        Self(a.0.iter().zip(&b.0).map(|(&x, &y)| x || y).collect())
    }

    /// Positions at which two equal-width bitstrings differ.
    pub fn hamming(&self, other: &BitString) -> usize {
        self.0.iter().zip(&other.0).filter(|(a, b)| a != b).count()
            + self.len().abs_diff(other.len())
    }
}

impl FromStr for BitString {
    type Err = GaError;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(GaError::InvalidBitString(s.to_string())),
            })
            .collect::<Result<Vec<bool>>>()
            .map(Self)
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString({self})")
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bs(s: &str) -> BitString {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(bs("010011").to_string(), "010011");
        assert_eq!(bs("").len(), 0);
        assert_eq!(bs("010").bits(), &[false, true, false]);
        assert!("01x".parse::<BitString>().is_err());
    }

    #[test]
    fn test_from_index_zero_padded() {
        assert_eq!(BitString::from_index(0, 4).to_string(), "0000");
        assert_eq!(BitString::from_index(9, 4).to_string(), "1001");
        assert_eq!(BitString::from_index(3, 2).to_string(), "11");
        assert_eq!(bs("1001").to_index(), Some(9));
        assert_eq!(bs("").to_index(), Some(0));
    }

    #[test]
    fn test_split_at_any_index() {
        let (l, r) = bs("110010").split_at(3).unwrap();
        assert_eq!(l.to_string(), "110");
        assert_eq!(r.to_string(), "010");

        let (l, r) = bs("110010").split_at(6).unwrap();
        assert_eq!(l.len(), 6);
        assert!(r.is_empty());

        assert_eq!(
            bs("11").split_at(3),
            Err(GaError::SplitOutOfRange { index: 3, width: 2 })
        );
    }

    #[test]
    fn test_or_left_pads_shorter_operand() {
        assert_eq!(bs("1000").or(&bs("0011")).to_string(), "1011");
        assert_eq!(bs("1000").or(&bs("11")).to_string(), "1011");
        assert_eq!(bs("01").or(&bs("1000")).to_string(), "1001");
    }

    #[test]
    fn test_flip_and_count() {
        let mut b = bs("0000");
        b.flip(1);
        b.flip(3);
        assert_eq!(b.to_string(), "0101");
        assert_eq!(b.count_ones(), 2);
        b.flip(10);
        assert_eq!(b.to_string(), "0101");
    }

    #[test]
    fn test_concat_and_slice() {
        let parts = [bs("10"), bs("0"), bs("111")];
        let joined = BitString::concat(&parts);
        assert_eq!(joined.to_string(), "100111");
        assert_eq!(joined.slice(2..5).to_string(), "011");
    }

    #[test]
    fn test_hamming() {
        assert_eq!(bs("1010").hamming(&bs("1001")), 2);
        assert_eq!(bs("1010").hamming(&bs("1010")), 0);
    }
}
