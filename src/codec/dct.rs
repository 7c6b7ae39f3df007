// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Full-image DCT watermarking.
//!
//! The whole image is one block: `C = DCT(image)`, `C' = C + alpha · W`,
//! `image' = IDCT(C')`. The output is not clamped, so the embedding stays a
//! pure additive perturbation and decode
//! `round(clip((DCT(image') - DCT(image)) / alpha, 0, 1))` recovers `W`
//! exactly up to floating-point precision.

use tracing::debug;

use super::{check_pair, check_watermark_shape, Encoded, WatermarkCodec};
use crate::binarize::round_clip;
use crate::config::CodecConfig;
use crate::error::{Result, Shape};
use crate::image::{mask_to_f64, shape_of, Image, Mask};
use crate::transform::{NativeEngine, TransformEngine};

/// DCT-domain codec.
#[derive(Debug, Clone)]
pub struct DctCodec<E = NativeEngine> {
    config: CodecConfig,
    engine: E,
}

impl DctCodec<NativeEngine> {
    pub fn new(config: CodecConfig) -> Self {
        Self::with_engine(config, NativeEngine)
    }
}

impl Default for DctCodec<NativeEngine> {
    fn default() -> Self {
        Self::new(CodecConfig::dct())
    }
}

impl<E: TransformEngine> DctCodec<E> {
    /// Codec running on a caller-supplied transform engine.
    pub fn with_engine(config: CodecConfig, engine: E) -> Self {
        Self { config, engine }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

impl<E: TransformEngine> WatermarkCodec for DctCodec<E> {
    type Context = ();

    fn name(&self) -> &'static str {
        "Discrete Cosine Transform (DCT)"
    }

    fn alpha(&self) -> f64 {
        self.config.alpha
    }

    fn watermark_shape(&self, image_shape: Shape) -> Shape {
        image_shape
    }

    fn encode(&self, image: &Image, watermark: &Mask, key: u64) -> Result<Encoded<()>> {
        self.config.validate()?;
        check_watermark_shape(self, image, watermark)?;
        debug!(
            shape = ?shape_of(image),
            alpha = self.config.alpha,
            key_mode = ?self.config.key_mode,
            "dct encode"
        );

        let embedded = mask_to_f64(&self.config.key_mode.apply(watermark, key));
        let coeffs = self.engine.dct2(image);
        let marked = coeffs + embedded * self.config.alpha;

        Ok(Encoded {
            image: self.engine.idct2(&marked),
            watermark: watermark.clone(),
            context: (),
        })
    }

    fn decode(
        &self,
        original: &Image,
        watermarked: &Image,
        _context: &(),
        key: u64,
    ) -> Result<Mask> {
        self.config.validate()?;
        check_pair(original, watermarked)?;
        debug!(shape = ?shape_of(original), alpha = self.config.alpha, "dct decode");

        let diff = self.engine.dct2(watermarked) - self.engine.dct2(original);
        let estimate = diff / self.config.alpha;
        Ok(self.config.key_mode.restore(round_clip(&estimate), key))
    }
}
