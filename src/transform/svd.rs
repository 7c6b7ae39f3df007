// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Economy singular value decomposition on top of nalgebra.

use nalgebra::{DMatrix, DVector};

use crate::error::{Result, WatermarkError};
use crate::image::Image;

/// `m = u · diag(singular_values) · v_t` with `k = min(rows, cols)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Svd {
    /// Left factor, `rows × k`, orthonormal columns.
    pub u: DMatrix<f64>,
    /// Singular values, descending.
    pub singular_values: DVector<f64>,
    /// Right factor (transposed), `k × cols`, orthonormal rows.
    pub v_t: DMatrix<f64>,
}

impl Svd {
    /// Number of singular values.
    pub fn rank(&self) -> usize {
        self.singular_values.len()
    }

    /// Rebuild the matrix from the stored factors.
    pub fn recompose(&self) -> Image {
        self.recompose_with(&self.singular_values)
    }

    /// Rebuild the matrix from the stored factors and replacement singular
    /// values. Only the first `min(k, s.len())` factors take part.
    pub fn recompose_with(&self, s: &DVector<f64>) -> Image {
        recompose_truncated(&self.u, s, &self.v_t)
    }
}

/// `u[:, ..k] · diag(s[..k]) · v_t[..k, :]` where `k` is the shortest of the
/// three inner dimensions.
pub fn recompose_truncated(u: &DMatrix<f64>, s: &DVector<f64>, v_t: &DMatrix<f64>) -> Image {
    let k = s.len().min(u.ncols()).min(v_t.nrows());
    let sigma = DMatrix::from_diagonal(&s.rows(0, k).into_owned());
    u.columns(0, k) * sigma * v_t.rows(0, k)
}

/// Decompose `m`. Singular values come back sorted in descending order.
/// An empty matrix yields empty factors (`rows × 0`, `0 × cols`).
///
/// # Errors
/// [`WatermarkError::Transform`] if the iteration does not converge.
pub fn decompose(m: &Image) -> Result<Svd> {
    if m.is_empty() {
        return Ok(Svd {
            u: DMatrix::zeros(m.nrows(), 0),
            singular_values: DVector::zeros(0),
            v_t: DMatrix::zeros(0, m.ncols()),
        });
    }

    let svd = m
        .clone()
        .try_svd(true, true, f64::EPSILON, 0)
        .ok_or(WatermarkError::Transform("singular value decomposition did not converge"))?;
    let u = svd
        .u
        .ok_or(WatermarkError::Transform("singular value decomposition produced no left factor"))?;
    let v_t = svd
        .v_t
        .ok_or(WatermarkError::Transform("singular value decomposition produced no right factor"))?;
    Ok(Svd { u, singular_values: svd.singular_values, v_t })
}
