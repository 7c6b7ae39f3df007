// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Transform-domain watermark codecs.
//!
//! Three schemes share one contract, [`WatermarkCodec`]:
//!
//! - **DCT** ([`DctCodec`]): additive embedding into the full-image cosine
//!   coefficients. Watermark has the image's shape.
//! - **DWT** ([`DwtCodec`]): additive embedding into the LL subband of a
//!   single-level wavelet decomposition. Watermark is half the image per axis.
//! - **DWT+SVD** ([`DwtSvdCodec`]): the watermark's singular values are added
//!   to those of the LL subband. Decode needs the [`EncodingContext`]
//!   returned by encode.
//!
//! All schemes are non-blind: decode compares against the original image.

pub mod dct;
pub mod dwt;
pub mod dwt_svd;

pub use dct::DctCodec;
pub use dwt::DwtCodec;
pub use dwt_svd::{DwtSvdCodec, DwtSvdSession, EncodingContext, SessionState};

use crate::error::{Result, Shape};
use crate::image::{ensure_shape, shape_of, Image, Mask};

/// Result of an encode call.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded<C> {
    /// The watermarked image.
    pub image: Image,
    /// The watermark as passed in, returned for convenience.
    pub watermark: Mask,
    /// Data decode needs besides the two images (`()` for most schemes).
    pub context: C,
}

/// Embed/extract contract shared by every scheme.
pub trait WatermarkCodec {
    /// Encode-time data required by decode.
    type Context;

    /// Human readable scheme name.
    fn name(&self) -> &'static str;

    /// Embedding strength.
    fn alpha(&self) -> f64;

    /// Watermark shape this scheme accepts for an image of `image_shape`.
    fn watermark_shape(&self, image_shape: Shape) -> Shape;

    /// Embed `watermark` into `image`.
    ///
    /// # Errors
    /// - `Configuration` if alpha is zero.
    /// - `ShapeMismatch` if the watermark shape violates the scheme's
    ///   invariant (checked before any transform work).
    fn encode(&self, image: &Image, watermark: &Mask, key: u64)
        -> Result<Encoded<Self::Context>>;

    /// Estimate the watermark embedded in `watermarked` by comparing it
    /// with `original`.
    ///
    /// # Errors
    /// - `Configuration` if alpha is zero.
    /// - `ShapeMismatch` if the two images differ in shape.
    /// - `NumericDegeneracy` for schemes that min-max normalize when the
    ///   estimate is flat.
    fn decode(
        &self,
        original: &Image,
        watermarked: &Image,
        context: &Self::Context,
        key: u64,
    ) -> Result<Mask>;
}

/// Shape check shared by every encode: the watermark must be exactly
/// `codec.watermark_shape(image)`. Images with odd dimensions never match
/// for the half-size schemes.
pub(crate) fn check_watermark_shape<C: WatermarkCodec + ?Sized>(
    codec: &C,
    image: &Image,
    watermark: &Mask,
) -> Result<()> {
    let image_shape = shape_of(image);
    let expected = codec.watermark_shape(image_shape);
    ensure_shape("watermark vs image", expected, shape_of(watermark))
}

/// The half-size schemes can only decompose even-sized images.
pub(crate) fn check_even(what: &'static str, image: &Image) -> Result<()> {
    let (rows, cols) = shape_of(image);
    ensure_shape(what, (rows - rows % 2, cols - cols % 2), (rows, cols))
}

/// Both images handed to decode must have the same shape.
pub(crate) fn check_pair(original: &Image, watermarked: &Image) -> Result<()> {
    ensure_shape("watermarked vs original image", shape_of(original), shape_of(watermarked))
}
