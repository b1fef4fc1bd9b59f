use crate::error::{ConvertError, Result};
use crate::format::parse_header;
use crate::storage::{VectorSet, Word, PREALLOC_LIMIT};
use std::io::{BufRead, Read, Write};
use zerocopy::byteorder::little_endian::F32;
use zerocopy::{FromBytes, IntoBytes};

const SPACE: u8 = b' ';
const NEWLINE: u8 = b'\n';

/// Reads the binary word-vector format.
///
/// Layout: an ASCII header `"V D\n"`, then V records of a word token
/// terminated by a single space, immediately followed by D little-endian
/// `f32` values. Newline bytes met while scanning a token are skipped, so
/// the line break that usually trails each vector never reaches a word.
pub struct BinaryVectorReader<R> {
    inner: R,
    vocab_size: usize,
    dim: usize,
    vector_bytes: usize,
    next_index: usize,
}

impl<R: BufRead> BinaryVectorReader<R> {
    pub fn new(mut inner: R) -> Result<Self> {
        let mut header = Vec::new();
        inner.read_until(NEWLINE, &mut header)?;
        let (vocab_size, dim) = parse_header(&header)?;
        let vector_bytes = dim.checked_mul(4).ok_or_else(|| {
            ConvertError::Format(format!("layer size {} is too large to address", dim))
        })?;
        Ok(Self {
            inner,
            vocab_size,
            dim,
            vector_bytes,
            next_index: 0,
        })
    }

    /// Declared vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Reads the next record, or `None` once V records have been read.
    pub fn next_record(&mut self) -> Result<Option<(Word, Vec<f32>)>> {
        if self.next_index >= self.vocab_size {
            return Ok(None);
        }
        let word = self.read_token()?;
        let vector = self.read_vector()?;
        self.next_index += 1;
        Ok(Some((word, vector)))
    }

    /// Reads all remaining records into a [`VectorSet`].
    pub fn read_all(self) -> Result<VectorSet> {
        self.read_all_with(|| {})
    }

    /// Like [`read_all`](Self::read_all), calling `on_record` after each record.
    pub fn read_all_with<F: FnMut()>(mut self, mut on_record: F) -> Result<VectorSet> {
        let mut vectors = VectorSet::with_capacity(self.dim, self.vocab_size);
        while let Some((word, vector)) = self.next_record()? {
            vectors.insert(word, vector)?;
            on_record();
        }
        Ok(vectors)
    }

    fn read_token(&mut self) -> Result<Word> {
        let mut word = Vec::new();
        loop {
            let buf = self.inner.fill_buf()?;
            if buf.is_empty() {
                // A missing terminator means the record and its vector are both absent.
                return Err(ConvertError::Truncation {
                    word_index: self.next_index,
                    expected: self.vector_bytes.saturating_add(1),
                    available: 0,
                });
            }

            let (consumed, done) = match buf.iter().position(|&b| b == SPACE) {
                Some(pos) => (pos + 1, Some(pos)),
                None => (buf.len(), None),
            };
            let end = done.unwrap_or(consumed);
            word.extend(buf[..end].iter().copied().filter(|&b| b != NEWLINE));
            self.inner.consume(consumed);

            if done.is_some() {
                return Ok(word);
            }
        }
    }

    fn read_vector(&mut self) -> Result<Vec<f32>> {
        let expected = self.vector_bytes;
        let mut bytes = Vec::with_capacity(expected.min(PREALLOC_LIMIT));
        (&mut self.inner)
            .take(expected as u64)
            .read_to_end(&mut bytes)?;
        if bytes.len() < expected {
            return Err(ConvertError::Truncation {
                word_index: self.next_index,
                expected,
                available: bytes.len(),
            });
        }
        decode_floats(&bytes)
    }
}

fn decode_floats(bytes: &[u8]) -> Result<Vec<f32>> {
    let values = <[F32]>::ref_from_bytes(bytes).map_err(|_| {
        ConvertError::Format(format!(
            "{} bytes is not a whole number of floats",
            bytes.len()
        ))
    })?;
    Ok(values.iter().map(|v| v.get()).collect())
}

/// Convenience wrapper: reads a whole binary vocabulary.
pub fn read_binary<R: BufRead>(input: R) -> Result<VectorSet> {
    BinaryVectorReader::new(input)?.read_all()
}

/// Writes the binary format readable by [`BinaryVectorReader`].
pub fn write_binary<W: Write>(vectors: &VectorSet, out: &mut W) -> Result<()> {
    write_binary_with(vectors, out, || {})
}

pub fn write_binary_with<W: Write, F: FnMut()>(
    vectors: &VectorSet,
    out: &mut W,
    mut on_record: F,
) -> Result<()> {
    writeln!(out, "{} {}", vectors.len(), vectors.dim())?;
    for (word, vector) in vectors.iter() {
        write_binary_record(out, word, vector)?;
        on_record();
    }
    Ok(())
}

pub fn write_binary_record<W: Write>(out: &mut W, word: &[u8], vector: &[f32]) -> Result<()> {
    let encoded: Vec<F32> = vector.iter().map(|&v| F32::new(v)).collect();
    out.write_all(word)?;
    out.write_all(&[SPACE])?;
    out.write_all(encoded.as_bytes())?;
    out.write_all(&[NEWLINE])?;
    Ok(())
}
