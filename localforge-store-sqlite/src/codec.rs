//! Embedding blob layout: `dim` little-endian f32 values, 4 bytes each.

use thiserror::Error;

const F32_BYTES: usize = std::mem::size_of::<f32>();

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("embedding blob has {got} bytes, expected {expected} for dimension {dim}")]
    LengthMismatch {
        dim: usize,
        expected: usize,
        got: usize,
    },
    #[error("embedding dimension {dim} is too large")]
    DimensionOverflow { dim: usize },
}

pub fn encode_embedding(values: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(values.len() * F32_BYTES);
    for value in values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Decodes a blob using the dimension recorded alongside it.
pub fn decode_embedding(bytes: &[u8], dim: usize) -> Result<Vec<f32>, CodecError> {
    let expected = dim
        .checked_mul(F32_BYTES)
        .ok_or(CodecError::DimensionOverflow { dim })?;
    if bytes.len() != expected {
        return Err(CodecError::LengthMismatch {
            dim,
            expected,
            got: bytes.len(),
        });
    }

    Ok(bytes
        .chunks_exact(F32_BYTES)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_little_endian() {
        assert_eq!(encode_embedding(&[1.0]), vec![0x00, 0x00, 0x80, 0x3f]);
    }

    #[test]
    fn decode_restores_exact_bits() {
        let values = [0.1_f32, -2.5, f32::MIN_POSITIVE, 0.0];
        let decoded = decode_embedding(&encode_embedding(&values), values.len()).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn decode_rejects_length_that_disagrees_with_dim() {
        let err = decode_embedding(&[0u8; 12], 4).unwrap_err();
        assert_eq!(
            err,
            CodecError::LengthMismatch {
                dim: 4,
                expected: 16,
                got: 12
            }
        );
    }

    #[test]
    fn decode_rejects_dimension_that_overflows() {
        let err = decode_embedding(&[0u8; 8], usize::MAX).unwrap_err();
        assert_eq!(err, CodecError::DimensionOverflow { dim: usize::MAX });
    }
}
