pub mod binary;
pub mod compressed;
pub mod text;

use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};

pub use binary::{read_binary, write_binary, write_binary_with, BinaryVectorReader};
pub use compressed::{write_compressed, write_compressed_with, CompressedWriter};
pub use text::{read_text, write_text, write_text_with};

/// Serialization target for a converted vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Header, codebook and bit-packed code rows
    #[default]
    Compressed,
    /// One human-readable line per word
    Text,
    /// Same layout as the binary input
    Binary,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Compressed => write!(f, "compressed"),
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Binary => write!(f, "binary"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "compressed" => Ok(OutputFormat::Compressed),
            "text" => Ok(OutputFormat::Text),
            "binary" => Ok(OutputFormat::Binary),
            _ => Err(ConvertError::Config(format!("Invalid output format: {}", s))),
        }
    }
}

/// Parses a `"V D"` header line into vocabulary size and layer size.
pub(crate) fn parse_header(line: &[u8]) -> Result<(usize, usize)> {
    let malformed = || {
        ConvertError::Format(format!(
            "expected header \"<vocab_size> <dim>\", got {:?}",
            String::from_utf8_lossy(line).trim_end()
        ))
    };

    let text = std::str::from_utf8(line).map_err(|_| malformed())?;
    let fields: Vec<&str> = text.split_ascii_whitespace().collect();
    match fields.as_slice() {
        [vocab, dim] => {
            let vocab = vocab.parse().map_err(|_| malformed())?;
            let dim = dim.parse().map_err(|_| malformed())?;
            Ok((vocab, dim))
        }
        _ => Err(malformed()),
    }
}
