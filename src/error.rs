// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for watermark embedding and extraction.
//!
//! [`WatermarkError`] covers every failure mode of the codecs and of the
//! native transform engine. All checks are eager: a codec never returns a
//! partial watermark.

use thiserror::Error;

/// Matrix shape as `(rows, cols)`.
pub type Shape = (usize, usize);

/// Errors that can occur during watermark encoding or decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WatermarkError {
    /// Two matrices violate a scheme's shape invariant.
    #[error("shape mismatch ({what}): expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Which invariant was checked (e.g. "watermark vs image").
        what: &'static str,
        expected: Shape,
        actual: Shape,
    },
    /// Decode was attempted on a session that has not encoded anything yet.
    #[error("decode requires an encoding context; call encode first")]
    UninitializedState,
    /// Min-max normalization over a matrix whose values are all equal.
    #[error("cannot normalize a difference matrix with zero dynamic range (all values ~ {value})")]
    NumericDegeneracy { value: f64 },
    /// Invalid codec configuration (zero alpha, unknown wavelet name).
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// A transform kernel could not produce a result.
    #[error("transform failed: {0}")]
    Transform(&'static str),
}

pub type Result<T> = std::result::Result<T, WatermarkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_message_names_both_shapes() {
        let e = WatermarkError::ShapeMismatch {
            what: "watermark vs image",
            expected: (8, 8),
            actual: (4, 4),
        };
        let msg = e.to_string();
        assert!(msg.contains("(8, 8)"), "{msg}");
        assert!(msg.contains("(4, 4)"), "{msg}");
        assert!(msg.contains("watermark vs image"), "{msg}");
    }

    #[test]
    fn configuration_message() {
        let e = WatermarkError::Configuration("alpha must be nonzero".into());
        assert_eq!(e.to_string(), "invalid configuration: alpha must be nonzero");
    }
}
