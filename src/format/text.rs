use crate::error::{ConvertError, Result};
use crate::format::parse_header;
use crate::storage::VectorSet;
use std::io::{BufRead, Write};

/// Writes `"V D"` followed by one `"word f1 ... fD"` line per word.
///
/// Floats use the shortest decimal form that parses back to the same `f32`.
pub fn write_text<W: Write>(vectors: &VectorSet, out: &mut W) -> Result<()> {
    write_text_with(vectors, out, || {})
}

pub fn write_text_with<W: Write, F: FnMut()>(
    vectors: &VectorSet,
    out: &mut W,
    mut on_record: F,
) -> Result<()> {
    writeln!(out, "{} {}", vectors.len(), vectors.dim())?;
    for (word, vector) in vectors.iter() {
        write_text_record(out, word, vector)?;
        on_record();
    }
    Ok(())
}

pub fn write_text_record<W: Write>(out: &mut W, word: &[u8], vector: &[f32]) -> Result<()> {
    out.write_all(word)?;
    for v in vector {
        write!(out, " {}", v)?;
    }
    out.write_all(b"\n")?;
    Ok(())
}

/// Reads the plain-text format produced by [`write_text`].
pub fn read_text<R: BufRead>(mut input: R) -> Result<VectorSet> {
    let mut line = Vec::new();
    input.read_until(b'\n', &mut line)?;
    let (vocab_size, dim) = parse_header(&line)?;

    let mut vectors = VectorSet::with_capacity(dim, vocab_size);
    for word_index in 0..vocab_size {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Err(ConvertError::Truncation {
                word_index,
                expected: 1,
                available: 0,
            });
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }

        let mut fields = line.split(|&b| b == b' ');
        let word = fields.next().unwrap_or_default().to_vec();
        let vector = fields
            .filter(|f| !f.is_empty())
            .map(|f| parse_float(f, word_index))
            .collect::<Result<Vec<f32>>>()?;

        if vector.len() != dim {
            return Err(ConvertError::DimensionMismatch {
                word_index,
                expected: dim,
                actual: vector.len(),
            });
        }
        vectors.insert(word, vector)?;
    }
    Ok(vectors)
}

fn parse_float(field: &[u8], word_index: usize) -> Result<f32> {
    std::str::from_utf8(field)
        .ok()
        .and_then(|s| s.trim_end_matches('\r').parse().ok())
        .ok_or_else(|| {
            ConvertError::Format(format!(
                "word {}: {:?} is not a float",
                word_index,
                String::from_utf8_lossy(field)
            ))
        })
}
