use crate::error::{ConvertError, Result};
use std::collections::HashMap;

/// An opaque vocabulary token. Never decoded as text.
pub type Word = Vec<u8>;

/// Upper bound on slots reserved up front; header counts are untrusted.
pub const PREALLOC_LIMIT: usize = 1 << 16;

/// Vocabulary of word vectors, kept in source order.
///
/// All vectors share the layer size given at construction. Inserting a
/// word that is already present replaces its vector but keeps its
/// original position.
#[derive(Debug, Clone, Default)]
pub struct VectorSet {
    dim: usize,
    entries: Vec<(Word, Vec<f32>)>,
    index: HashMap<Word, usize>,
    inserted: usize,
}

impl PartialEq for VectorSet {
    fn eq(&self, other: &Self) -> bool {
        self.dim == other.dim && self.entries == other.entries
    }
}

impl VectorSet {
    pub fn new(dim: usize) -> Self {
        Self::with_capacity(dim, 0)
    }

    /// Reserves room for up to `capacity` words, capped at [`PREALLOC_LIMIT`].
    pub fn with_capacity(dim: usize, capacity: usize) -> Self {
        let capacity = capacity.min(PREALLOC_LIMIT);
        Self {
            dim,
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            inserted: 0,
        }
    }

    /// Layer size shared by every vector.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of distinct words held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a vector, returning `true` if the word replaced an earlier one.
    ///
    /// Errors report the word's position among all inserts, duplicates included.
    pub fn insert(&mut self, word: Word, vector: Vec<f32>) -> Result<bool> {
        let word_index = self.inserted;
        self.inserted += 1;
        if vector.len() != self.dim {
            return Err(ConvertError::DimensionMismatch {
                word_index,
                expected: self.dim,
                actual: vector.len(),
            });
        }

        match self.index.get(&word) {
            Some(&pos) => {
                self.entries[pos].1 = vector;
                Ok(true)
            }
            None => {
                self.index.insert(word.clone(), self.entries.len());
                self.entries.push((word, vector));
                Ok(false)
            }
        }
    }

    pub fn get(&self, word: &[u8]) -> Option<&[f32]> {
        self.index
            .get(word)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[f32])> {
        self.entries
            .iter()
            .map(|(w, v)| (w.as_slice(), v.as_slice()))
    }

    pub fn vectors_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.entries.iter_mut().map(|(_, v)| v.as_mut_slice())
    }

    /// Iterates over every element of every vector.
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.entries.iter().flat_map(|(_, v)| v.iter().copied())
    }
}
