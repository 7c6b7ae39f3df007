// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Full-image orthonormal DCT-II and its inverse.
//!
//! The whole matrix is one block. The 1D transform of length `n` is the
//! `n×n` basis matrix `B[u][x] = C(u) · cos((2x + 1) · u · π / 2n)` with
//! `C(0) = sqrt(1/n)` and `C(u>0) = sqrt(2/n)`. `B` is orthogonal, so the
//! separable 2D pair is
//!
//! - forward: `B_rows · M · B_colsᵀ`
//! - inverse: `B_rowsᵀ · M · B_cols`

use std::f64::consts::PI;

use nalgebra::DMatrix;

use crate::image::Image;

/// Normalization constant for frequency `u` of a length-`n` transform.
fn norm(u: usize, n: usize) -> f64 {
    if u == 0 {
        (1.0 / n as f64).sqrt()
    } else {
        (2.0 / n as f64).sqrt()
    }
}

/// Orthonormal DCT-II basis for length `n`: row `u` is frequency `u`.
pub fn basis(n: usize) -> DMatrix<f64> {
    DMatrix::from_fn(n, n, |u, x| {
        norm(u, n) * ((2 * x + 1) as f64 * u as f64 * PI / (2 * n) as f64).cos()
    })
}

/// Forward 2D DCT over the whole image.
pub fn forward(m: &Image) -> Image {
    let rows = basis(m.nrows());
    let cols = basis(m.ncols());
    &rows * m * cols.transpose()
}

/// Inverse 2D DCT over the whole image.
pub fn inverse(m: &Image) -> Image {
    let rows = basis(m.nrows());
    let cols = basis(m.ncols());
    rows.transpose() * m * &cols
}
