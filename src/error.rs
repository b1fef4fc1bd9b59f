use thiserror::Error;

/// Errors raised while reading, quantizing, packing or writing a vocabulary.
///
/// Every variant is fatal for the current conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Header line (or a text vector line) could not be parsed.
    #[error("Format error: {0}")]
    Format(String),

    /// The stream ended before the declared counts were satisfied.
    #[error("Truncated input at word {word_index}: expected {expected} bytes, got {available}")]
    Truncation {
        /// Zero-based index of the word being read
        word_index: usize,
        /// Bytes still required
        expected: usize,
        /// Bytes actually available
        available: usize,
    },

    /// Unrecognized threshold mode or output format.
    #[error("Config error: {0}")]
    Config(String),

    /// Distinct value count cannot be represented by a byte-dividing width.
    #[error(
        "Unsupported cardinality: {distinct} distinct values need {bits} bits, not a divisor of 8"
    )]
    UnsupportedCardinality {
        /// Number of distinct quantized values
        distinct: usize,
        /// Minimal bit width for that many values
        bits: u32,
    },

    /// A vector's length disagrees with the declared layer size.
    #[error("Dimension mismatch at word {word_index}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Zero-based index of the offending word
        word_index: usize,
        /// Declared layer size
        expected: usize,
        /// Observed vector length
        actual: usize,
    },

    /// A value was looked up that the codebook never saw.
    #[error("Value {0} is not in the codebook")]
    ValueNotInCodebook(f32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
