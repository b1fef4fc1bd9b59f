use crate::error::{ConvertError, Result};
use crate::storage::VectorSet;
use serde::{Deserialize, Serialize};

/// Elementwise quantization strategy applied to a whole vocabulary.
///
/// - `None`: values pass through unchanged
/// - `SignedTernary`: every value becomes `+1/3` or `-1/3`
/// - `BinaryBucket`: every value becomes one of `±0.25`, `±0.75`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    #[default]
    None,
    SignedTernary,
    BinaryBucket,
}

impl ThresholdMode {
    /// Maps a single value. Zero counts as non-negative.
    pub fn apply(self, x: f32) -> f32 {
        let sign = if x < 0.0 { -1.0f32 } else { 1.0 };
        match self {
            ThresholdMode::None => x,
            ThresholdMode::SignedTernary => sign / 3.0,
            ThresholdMode::BinaryBucket => {
                let m = x * sign;
                if (0.0..=0.5).contains(&m) {
                    sign * 0.25
                } else {
                    sign * 0.75
                }
            }
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ThresholdMode::None => 0,
            ThresholdMode::SignedTernary => 1,
            ThresholdMode::BinaryBucket => 2,
        }
    }
}

impl TryFrom<u8> for ThresholdMode {
    type Error = ConvertError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ThresholdMode::None),
            1 => Ok(ThresholdMode::SignedTernary),
            2 => Ok(ThresholdMode::BinaryBucket),
            other => Err(ConvertError::Config(format!(
                "Invalid threshold mode: {} (expected 0, 1 or 2)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdMode::None => write!(f, "none"),
            ThresholdMode::SignedTernary => write!(f, "signed_ternary"),
            ThresholdMode::BinaryBucket => write!(f, "binary_bucket"),
        }
    }
}

impl std::str::FromStr for ThresholdMode {
    type Err = ConvertError;

    /// Accepts either the numeric code or the mode name.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "0" | "none" => Ok(ThresholdMode::None),
            "1" | "signed_ternary" => Ok(ThresholdMode::SignedTernary),
            "2" | "binary_bucket" => Ok(ThresholdMode::BinaryBucket),
            _ => Err(ConvertError::Config(format!("Invalid threshold mode: {}", s))),
        }
    }
}

/// Quantizes every element of every vector in place.
pub fn quantize(vectors: &mut VectorSet, mode: ThresholdMode) {
    quantize_with(vectors, mode, || {});
}

/// Like [`quantize`], calling `on_vector` after each vector. `None` is a no-op.
pub fn quantize_with<F: FnMut()>(
    vectors: &mut VectorSet,
    mode: ThresholdMode,
    mut on_vector: F,
) {
    if mode == ThresholdMode::None {
        return;
    }
    for vector in vectors.vectors_mut() {
        quantize_slice(vector, mode);
        on_vector();
    }
}

pub fn quantize_slice(values: &mut [f32], mode: ThresholdMode) {
    for x in values.iter_mut() {
        *x = mode.apply(*x);
    }
}
