// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Matrix types shared by the codecs and the transform engine.

use nalgebra::DMatrix;

use crate::error::{Result, Shape, WatermarkError};

/// Grayscale image: real samples, nominally 0–255.
pub type Image = DMatrix<f64>;

/// Binary watermark or extracted mask.
pub type Mask = DMatrix<u8>;

/// `(rows, cols)` of any matrix.
pub fn shape_of<T>(m: &DMatrix<T>) -> Shape {
    (m.nrows(), m.ncols())
}

/// Shape of the LL subband of a single-level decomposition: `floor(n / 2)`
/// per axis.
pub fn half_shape(shape: Shape) -> Shape {
    (shape.0 / 2, shape.1 / 2)
}

/// Fail with [`WatermarkError::ShapeMismatch`] unless `actual == expected`
/// on both axes.
pub fn ensure_shape(what: &'static str, expected: Shape, actual: Shape) -> Result<()> {
    if expected != actual {
        return Err(WatermarkError::ShapeMismatch { what, expected, actual });
    }
    Ok(())
}

/// Mask cells as `f64` for additive embedding.
pub fn mask_to_f64(mask: &Mask) -> Image {
    mask.map(f64::from)
}

/// Slack absorbed before truncation, so residue like `99.9999999` stays at
/// `100` instead of dropping a level.
pub const QUANTIZE_SLACK: f64 = 1e-6;

/// Truncate to whole intensities and clamp to the pixel range, matching an
/// 8-bit pixel store.
pub fn to_pixel_range(image: &Image) -> Image {
    image.map(|v| (v + QUANTIZE_SLACK).floor().clamp(0.0, 255.0))
}
