//! Ordered gene sequences and whole-genome bit manipulation.
//!
//! A genome's topology is the sequence of encoders its genes are bound to.
//! It is fixed when the genome is built: rebuilding from a new bitstring
//! re-slices the bits by each position's declared width and rebinds the
//! slices to the original encoders, which is how raw crossover offspring
//! become typed genomes again.

use super::bits::BitString;
use super::encoder::Encoder;
use super::gene::Gene;
use super::types::Symbol;
use crate::error::{GaError, Result};
use rand::Rng;
use std::ops::Range;
use std::sync::Arc;

/// Ordered sequence of genes.
#[derive(Debug, Clone)]
pub struct Genome<T: Symbol> {
    genes: Vec<Gene<T>>,
}

impl<T: Symbol> Genome<T> {
    /// Wraps a gene sequence.
    pub fn new(genes: Vec<Gene<T>>) -> Self {
        Self { genes }
    }

    /// A random genome over the given topology.
    pub fn random<R: Rng>(encoders: &[Arc<Encoder<T>>], rng: &mut R) -> Self {
        Self::new(
            encoders
                .iter()
                .map(|e| Gene::random(Arc::clone(e), rng))
                .collect(),
        )
    }

    /// A genome over `encoders` holding `bits`.
    ///
    /// `bits` must be exactly as wide as the topology.
    pub fn from_bits(encoders: &[Arc<Encoder<T>>], bits: &BitString) -> Result<Self> {
        let width: usize = encoders.iter().map(|e| e.bit_width()).sum();
        if bits.len() != width {
            return Err(GaError::WidthMismatch {
                expected: width,
                actual: bits.len(),
            });
        }
        let mut offset = 0;
        let mut genes = Vec::with_capacity(encoders.len());
        for encoder in encoders {
            let end = offset + encoder.bit_width();
            genes.push(Gene::with_bits(Arc::clone(encoder), bits.slice(offset..end))?);
            offset = end;
        }
        Ok(Self { genes })
    }

    /// The genes in order.
    pub fn genes(&self) -> &[Gene<T>] {
        &self.genes
    }

    /// Number of genes.
    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    /// Total width in bits.
    pub fn len(&self) -> usize {
        self.genes.iter().map(Gene::len).sum()
    }

    /// Whether the genome has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// The topology: one encoder per position.
    pub fn encoders(&self) -> Vec<Arc<Encoder<T>>> {
        self.genes.iter().map(|g| Arc::clone(g.encoder())).collect()
    }

    /// Bit range covered by each gene, in order.
    pub fn gene_spans(&self) -> Vec<Range<usize>> {
        let mut offset = 0;
        self.genes
            .iter()
            .map(|g| {
                let span = offset..offset + g.len();
                offset = span.end;
                span
            })
            .collect()
    }

    /// Concatenation of every gene's code.
    pub fn encoded(&self) -> BitString {
        BitString::concat(self.genes.iter().map(Gene::encoded)).left_padded(self.len())
    }

    /// Decoded symbols in order.
    pub fn decoded_values(&self) -> Result<Vec<&T>> {
        self.genes.iter().map(Gene::decoded).collect()
    }

    /// Concatenation of every decoded symbol's text form.
    pub fn decoded(&self) -> Result<String> {
        Ok(self
            .decoded_values()?
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    /// Splits the full encoded bitstring at an arbitrary bit index.
    pub fn split(&self, index: usize) -> Result<(BitString, BitString)> {
        self.encoded().split_at(index)
    }

    /// Replaces every gene by re-slicing `bits` over the original topology.
    pub fn set_encoded(&mut self, bits: &BitString) -> Result<()> {
        let rebuilt = Self::from_bits(&self.encoders(), bits)?;
        self.genes = rebuilt.genes;
        Ok(())
    }

    /// Replaces every gene by encoding `values` position by position.
    pub fn set_decoded(&mut self, values: &[T]) -> Result<()> {
        if values.len() != self.genes.len() {
            return Err(GaError::Config(format!(
                "expected {} values, got {}",
                self.genes.len(),
                values.len()
            )));
        }
        let genes = self
            .genes
            .iter()
            .zip(values)
            .map(|(g, v)| Gene::with_value(Arc::clone(g.encoder()), v))
            .collect::<Result<Vec<_>>>()?;
        self.genes = genes;
        Ok(())
    }

    /// Resamples every gene.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        for gene in &mut self.genes {
            gene.randomize(rng);
        }
    }

    /// Whether every gene holds a domain member.
    pub fn is_valid(&self) -> bool {
        self.genes.iter().all(Gene::is_valid)
    }
}
