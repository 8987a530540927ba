//! A single encoded slot bound to a shared encoder.

use super::bits::BitString;
use super::encoder::Encoder;
use super::types::Symbol;
use crate::error::{GaError, Result};
use rand::Rng;
use std::sync::Arc;

/// One fixed-width slot of a genome.
///
/// The stored bitstring always has exactly `encoder.bit_width()` bits. It
/// may still hold an unassigned code (after crossover or mutation), in which
/// case [`is_valid`](Gene::is_valid) is `false` and [`decoded`](Gene::decoded)
/// fails.
#[derive(Debug, Clone)]
pub struct Gene<T: Symbol> {
    encoder: Arc<Encoder<T>>,
    bits: BitString,
}

impl<T: Symbol> Gene<T> {
    /// A gene holding a random domain member.
    pub fn random<R: Rng>(encoder: Arc<Encoder<T>>, rng: &mut R) -> Self {
        let bits = encoder.random_bitstring(rng);
        Self { encoder, bits }
    }

    /// A gene holding `value`. Fails if `value` is outside the domain.
    pub fn with_value(encoder: Arc<Encoder<T>>, value: &T) -> Result<Self> {
        let bits = encoder.encode(value)?;
        Ok(Self { encoder, bits })
    }

    /// A gene holding a raw code.
    ///
    /// The width must match the encoder; unassigned codes are accepted and
    /// reported through [`is_valid`](Gene::is_valid).
    pub fn with_bits(encoder: Arc<Encoder<T>>, bits: BitString) -> Result<Self> {
        if bits.len() != encoder.bit_width() {
            return Err(GaError::WidthMismatch {
                expected: encoder.bit_width(),
                actual: bits.len(),
            });
        }
        Ok(Self { encoder, bits })
    }

    /// Resamples a random domain member.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        self.bits = self.encoder.random_bitstring(rng);
    }

    /// The bound encoder.
    pub fn encoder(&self) -> &Arc<Encoder<T>> {
        &self.encoder
    }

    /// Width in bits.
    pub fn len(&self) -> usize {
        self.encoder.bit_width()
    }

    /// Always `false`: encoders have at least one bit.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The stored code.
    pub fn encoded(&self) -> &BitString {
        &self.bits
    }

    /// The decoded symbol.
    pub fn decoded(&self) -> Result<&T> {
        self.encoder.decode(&self.bits)
    }

    /// Whether the code decodes to a true domain member.
    pub fn is_valid(&self) -> bool {
        self.decoded()
            .map(|v| self.encoder.contains(v))
            .unwrap_or(false)
    }
}
