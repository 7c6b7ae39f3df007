// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Transform kernels behind the [`TransformEngine`] capability.
//!
//! Codecs never call the kernels directly; they receive an engine and use
//! only the trait. [`NativeEngine`] is the in-crate implementation:
//!
//! - **DCT**: separable orthonormal DCT-II over the whole matrix
//!   ([`dct`]).
//! - **DWT**: single-level periodized orthogonal filter bank for the
//!   [`Wavelet`] families ([`dwt`]).
//! - **SVD**: economy decomposition backed by nalgebra ([`svd`]).

pub mod dct;
pub mod dwt;
pub mod svd;

use crate::error::Result;
use crate::image::Image;

pub use dwt::{Subbands, Wavelet};
pub use svd::Svd;

/// Numeric primitives consumed by the codecs.
///
/// Implementations must be exact inverse pairs up to floating-point
/// precision: `idct2(dct2(m)) ≈ m`, `idwt2(dwt2(m)) ≈ m`, and
/// `svd(m).recompose() ≈ m`.
pub trait TransformEngine {
    /// Forward 2D orthonormal cosine transform.
    fn dct2(&self, m: &Image) -> Image;

    /// Inverse of [`dct2`](Self::dct2).
    fn idct2(&self, m: &Image) -> Image;

    /// Single-level 2D wavelet decomposition.
    fn dwt2(&self, m: &Image, wavelet: Wavelet) -> Result<Subbands>;

    /// Reconstruction from the four subbands of [`dwt2`](Self::dwt2).
    fn idwt2(&self, bands: &Subbands, wavelet: Wavelet) -> Result<Image>;

    /// Economy singular value decomposition, singular values descending.
    fn svd(&self, m: &Image) -> Result<Svd>;
}

/// Pure-Rust engine used by default in every codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeEngine;

impl TransformEngine for NativeEngine {
    fn dct2(&self, m: &Image) -> Image {
        dct::forward(m)
    }

    fn idct2(&self, m: &Image) -> Image {
        dct::inverse(m)
    }

    fn dwt2(&self, m: &Image, wavelet: Wavelet) -> Result<Subbands> {
        dwt::decompose(m, wavelet)
    }

    fn idwt2(&self, bands: &Subbands, wavelet: Wavelet) -> Result<Image> {
        dwt::reconstruct(bands, wavelet)
    }

    fn svd(&self, m: &Image) -> Result<Svd> {
        svd::decompose(m)
    }
}

impl<E: TransformEngine + ?Sized> TransformEngine for &E {
    fn dct2(&self, m: &Image) -> Image {
        (**self).dct2(m)
    }

    fn idct2(&self, m: &Image) -> Image {
        (**self).idct2(m)
    }

    fn dwt2(&self, m: &Image, wavelet: Wavelet) -> Result<Subbands> {
        (**self).dwt2(m, wavelet)
    }

    fn idwt2(&self, bands: &Subbands, wavelet: Wavelet) -> Result<Image> {
        (**self).idwt2(bands, wavelet)
    }

    fn svd(&self, m: &Image) -> Result<Svd> {
        (**self).svd(m)
    }
}
