// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # wavemark-core
//!
//! Transform-domain watermarking for grayscale images. A binary watermark
//! is added to the image's transform coefficients and later recovered by
//! comparing the watermarked image with the original (non-blind detection).
//!
//! Three schemes share the [`WatermarkCodec`] contract:
//!
//! - **DCT** ([`DctCodec`]): full-image cosine coefficients; exact recovery.
//! - **DWT** ([`DwtCodec`]): the LL subband of a single-level wavelet
//!   decomposition; watermark is half the image size per axis.
//! - **DWT+SVD** ([`DwtSvdCodec`]): singular values of the LL subband; decode
//!   needs the [`EncodingContext`] returned by encode.
//!
//! Transforms come from a [`TransformEngine`]. [`NativeEngine`] is the
//! default; enable the `parallel` feature to run wavelet filtering on rayon.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use wavemark_core::{DctCodec, Image, Mask, WatermarkCodec};
//!
//! let image = Image::from_fn(64, 64, |r, c| ((r * 3 + c) % 256) as f64);
//! let watermark = Mask::from_fn(64, 64, |r, c| ((r ^ c) & 1) as u8);
//!
//! let codec = DctCodec::default();
//! let encoded = codec.encode(&image, &watermark, 42)?;
//! let recovered = codec.decode(&image, &encoded.image, &encoded.context, 42)?;
//! assert_eq!(recovered, watermark);
//! ```

pub mod binarize;
pub mod codec;
pub mod config;
pub mod error;
pub mod image;
pub mod scramble;
pub mod transform;

pub use codec::{
    DctCodec, DwtCodec, DwtSvdCodec, DwtSvdSession, Encoded, EncodingContext, SessionState,
    WatermarkCodec,
};
pub use config::{
    CodecConfig, KeyMode, DEFAULT_DCT_ALPHA, DEFAULT_DWT_ALPHA, DEFAULT_DWT_SVD_ALPHA,
};
pub use error::{Result, Shape, WatermarkError};
pub use image::{Image, Mask};
pub use transform::{NativeEngine, Subbands, Svd, TransformEngine, Wavelet};
