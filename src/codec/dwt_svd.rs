// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! DWT+SVD watermarking: singular values of the LL subband carry the mark.
//!
//! Encode:
//! 1. `LL = U · diag(s) · Vᵀ` (economy SVD of the LL subband).
//! 2. `W = U_w · diag(s_w) · V_wᵀ` (economy SVD of the watermark).
//! 3. `s' = s + alpha · s_w`, aligned to the shorter vector.
//! 4. `LL' = U · diag(s') · Vᵀ`, inverse DWT, truncate to whole
//!    intensities, clamp to [0, 255].
//!
//! `U_w` and `V_wᵀ` form the [`EncodingContext`]. Decode re-estimates
//! `s_w ≈ (s(LL(image')) - s(LL(image))) / alpha`, rebuilds
//! `U_w · diag(s_w) · V_wᵀ`, min-max normalizes it and thresholds at 0.5
//! into {0, 255}.
//!
//! [`DwtSvdCodec`] is stateless and takes the context as an argument.
//! [`DwtSvdSession`] keeps the last context for callers that want the
//! encode-then-decode object lifecycle.

use nalgebra::DMatrix;
use tracing::debug;

use super::{check_even, check_pair, check_watermark_shape, Encoded, WatermarkCodec};
use crate::binarize::min_max_threshold;
use crate::config::CodecConfig;
use crate::error::{Result, Shape, WatermarkError};
use crate::image::{ensure_shape, half_shape, mask_to_f64, shape_of, to_pixel_range, Image, Mask};
use crate::transform::svd::recompose_truncated;
use crate::transform::{NativeEngine, TransformEngine};

/// Watermark factor matrices produced by encode and required by decode.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingContext {
    /// Left singular vectors of the embedded watermark, `rows × k`.
    pub u: DMatrix<f64>,
    /// Right singular vectors (transposed), `k × cols`.
    pub v_t: DMatrix<f64>,
}

impl EncodingContext {
    /// Shape of the watermark these factors were taken from.
    pub fn watermark_shape(&self) -> Shape {
        (self.u.nrows(), self.v_t.ncols())
    }
}

/// DWT+SVD codec.
#[derive(Debug, Clone)]
pub struct DwtSvdCodec<E = NativeEngine> {
    config: CodecConfig,
    engine: E,
}

impl DwtSvdCodec<NativeEngine> {
    pub fn new(config: CodecConfig) -> Self {
        Self::with_engine(config, NativeEngine)
    }
}

impl Default for DwtSvdCodec<NativeEngine> {
    fn default() -> Self {
        Self::new(CodecConfig::dwt_svd())
    }
}

impl<E: TransformEngine> DwtSvdCodec<E> {
    /// Codec running on a caller-supplied transform engine.
    pub fn with_engine(config: CodecConfig, engine: E) -> Self {
        Self { config, engine }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Singular values of the LL subband of `image`.
    fn ll_singular_values(&self, image: &Image) -> Result<nalgebra::DVector<f64>> {
        let ll = self.engine.dwt2(image, self.config.wavelet)?.ll;
        Ok(self.engine.svd(&ll)?.singular_values)
    }
}

impl<E: TransformEngine> WatermarkCodec for DwtSvdCodec<E> {
    type Context = EncodingContext;

    fn name(&self) -> &'static str {
        "Discrete Wavelet Transform (DWT) + SVD"
    }

    fn alpha(&self) -> f64 {
        self.config.alpha
    }

    fn watermark_shape(&self, image_shape: Shape) -> Shape {
        half_shape(image_shape)
    }

    fn encode(
        &self,
        image: &Image,
        watermark: &Mask,
        key: u64,
    ) -> Result<Encoded<EncodingContext>> {
        self.config.validate()?;
        check_watermark_shape(self, image, watermark)?;
        check_even("image (even dimensions)", image)?;
        debug!(
            shape = ?shape_of(image),
            alpha = self.config.alpha,
            wavelet = %self.config.wavelet,
            key_mode = ?self.config.key_mode,
            "dwt+svd encode"
        );

        let mut bands = self.engine.dwt2(image, self.config.wavelet)?;
        let ll = self.engine.svd(&bands.ll)?;

        let embedded = mask_to_f64(&self.config.key_mode.apply(watermark, key));
        let mark = self.engine.svd(&embedded)?;

        let mut s_marked = ll.singular_values.clone();
        let k = s_marked.len().min(mark.rank());
        for i in 0..k {
            s_marked[i] += self.config.alpha * mark.singular_values[i];
        }

        bands.ll = ll.recompose_with(&s_marked);
        let marked = self.engine.idwt2(&bands, self.config.wavelet)?;

        Ok(Encoded {
            image: to_pixel_range(&marked),
            watermark: watermark.clone(),
            context: EncodingContext { u: mark.u, v_t: mark.v_t },
        })
    }

    fn decode(
        &self,
        original: &Image,
        watermarked: &Image,
        context: &EncodingContext,
        key: u64,
    ) -> Result<Mask> {
        self.config.validate()?;
        check_pair(original, watermarked)?;
        check_even("image (even dimensions)", original)?;
        ensure_shape(
            "encoding context vs image",
            half_shape(shape_of(original)),
            context.watermark_shape(),
        )?;
        debug!(
            shape = ?shape_of(original),
            alpha = self.config.alpha,
            wavelet = %self.config.wavelet,
            "dwt+svd decode"
        );

        let s_original = self.ll_singular_values(original)?;
        let s_marked = self.ll_singular_values(watermarked)?;
        let s_estimate = (s_marked - s_original) / self.config.alpha;

        let estimate = recompose_truncated(&context.u, &s_estimate, &context.v_t);
        let mask = min_max_threshold(&estimate, 255)?;
        Ok(self.config.key_mode.restore(mask, key))
    }
}

/// Lifecycle of a [`DwtSvdSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No encode yet; decode is invalid.
    Fresh,
    /// An encode stored its context; decode may be called any number of times.
    Encoded,
}

/// Stateful wrapper that remembers the context of the most recent encode.
///
/// `encode` takes `&mut self`, so a session cannot be encoded and decoded
/// concurrently. Each encode replaces the stored context.
#[derive(Debug, Clone)]
pub struct DwtSvdSession<E = NativeEngine> {
    codec: DwtSvdCodec<E>,
    context: Option<EncodingContext>,
}

impl Default for DwtSvdSession<NativeEngine> {
    fn default() -> Self {
        Self::new(DwtSvdCodec::default())
    }
}

impl<E: TransformEngine> DwtSvdSession<E> {
    pub fn new(codec: DwtSvdCodec<E>) -> Self {
        Self { codec, context: None }
    }

    pub fn codec(&self) -> &DwtSvdCodec<E> {
        &self.codec
    }

    pub fn state(&self) -> SessionState {
        match self.context {
            Some(_) => SessionState::Encoded,
            None => SessionState::Fresh,
        }
    }

    /// Context stored by the last successful encode.
    pub fn context(&self) -> Option<&EncodingContext> {
        self.context.as_ref()
    }

    /// Encode and keep the context. Returns `(watermarked_image, watermark)`.
    /// A failed encode leaves the previous state untouched.
    pub fn encode(&mut self, image: &Image, watermark: &Mask, key: u64) -> Result<(Image, Mask)> {
        let Encoded { image, watermark, context } = self.codec.encode(image, watermark, key)?;
        debug!(previous = ?self.state(), "session context stored");
        self.context = Some(context);
        Ok((image, watermark))
    }

    /// Decode with the stored context.
    ///
    /// # Errors
    /// [`WatermarkError::UninitializedState`] if nothing has been encoded yet,
    /// plus everything [`DwtSvdCodec::decode`](WatermarkCodec::decode) returns.
    pub fn decode(&self, original: &Image, watermarked: &Image, key: u64) -> Result<Mask> {
        let context = self.context.as_ref().ok_or(WatermarkError::UninitializedState)?;
        self.codec.decode(original, watermarked, context, key)
    }
}
