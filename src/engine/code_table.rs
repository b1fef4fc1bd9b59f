use crate::error::{ConvertError, Result};
use crate::storage::VectorSet;
use std::collections::HashMap;

/// Numeric code of a codebook value, in `[0, 2^width)`.
pub type Code = u8;

/// Widths that pack evenly into a byte.
pub const SUPPORTED_WIDTHS: [u32; 4] = [1, 2, 4, 8];

/// Codebook built once over a fully quantized vocabulary.
///
/// Values are sorted ascending; the k-th smallest distinct value has code k.
/// `0.0` and `-0.0` are the same entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeTable {
    values: Vec<f32>,
    codes: HashMap<u32, Code>,
    width: u32,
}

impl CodeTable {
    /// Builds the table from every element of every vector.
    pub fn build(vectors: &VectorSet) -> Result<Self> {
        Self::from_values(vectors.values())
    }

    pub fn from_values<I: IntoIterator<Item = f32>>(values: I) -> Result<Self> {
        let mut distinct: Vec<f32> = values.into_iter().map(canonical).collect();
        distinct.sort_by(|a, b| a.total_cmp(b));
        distinct.dedup_by_key(|v| v.to_bits());

        let width = min_width(distinct.len());
        if !SUPPORTED_WIDTHS.contains(&width) {
            return Err(ConvertError::UnsupportedCardinality {
                distinct: distinct.len(),
                bits: width,
            });
        }

        let codes = distinct
            .iter()
            .enumerate()
            .map(|(i, v)| (v.to_bits(), i as Code))
            .collect();

        Ok(Self {
            values: distinct,
            codes,
            width,
        })
    }

    pub fn code_of(&self, value: f32) -> Result<Code> {
        self.codes
            .get(&canonical(value).to_bits())
            .copied()
            .ok_or(ConvertError::ValueNotInCodebook(value))
    }

    /// Bits per code.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn codes_per_byte(&self) -> usize {
        (8 / self.width) as usize
    }

    /// Distinct values in code order.
    pub fn codebook(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Maps a vector to its codes.
    pub fn encode(&self, vector: &[f32]) -> Result<Vec<Code>> {
        vector.iter().map(|&v| self.code_of(v)).collect()
    }

    /// Maps codes back to codebook values. Codes outside the table decode to `None`.
    pub fn decode(&self, codes: &[Code]) -> Option<Vec<f32>> {
        codes
            .iter()
            .map(|&c| self.values.get(c as usize).copied())
            .collect()
    }
}

fn canonical(v: f32) -> f32 {
    if v == 0.0 { 0.0 } else { v }
}

/// Smallest `n >= 1` with `2^n >= count`.
pub fn min_width(count: usize) -> u32 {
    let mut n = 1;
    while (1usize << n) < count {
        n += 1;
    }
    n
}
