// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! DWT watermarking in the LL subband.
//!
//! Encode: `LL' = LL + alpha · W`, detail subbands untouched, inverse
//! transform without clamping. Decode: `(LL(image') - LL(image)) / alpha`,
//! min-max normalized over the whole matrix and thresholded at 0.5. Only the
//! ordering of the estimate survives normalization, so any watermark that
//! contains both values round-trips exactly.

use tracing::debug;

use super::{check_even, check_pair, check_watermark_shape, Encoded, WatermarkCodec};
use crate::binarize::min_max_threshold;
use crate::config::CodecConfig;
use crate::error::{Result, Shape};
use crate::image::{half_shape, mask_to_f64, shape_of, Image, Mask};
use crate::transform::{NativeEngine, TransformEngine};

/// DWT-domain codec.
#[derive(Debug, Clone)]
pub struct DwtCodec<E = NativeEngine> {
    config: CodecConfig,
    engine: E,
}

impl DwtCodec<NativeEngine> {
    pub fn new(config: CodecConfig) -> Self {
        Self::with_engine(config, NativeEngine)
    }
}

impl Default for DwtCodec<NativeEngine> {
    fn default() -> Self {
        Self::new(CodecConfig::dwt())
    }
}

impl<E: TransformEngine> DwtCodec<E> {
    /// Codec running on a caller-supplied transform engine.
    pub fn with_engine(config: CodecConfig, engine: E) -> Self {
        Self { config, engine }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}

impl<E: TransformEngine> WatermarkCodec for DwtCodec<E> {
    type Context = ();

    fn name(&self) -> &'static str {
        "Discrete Wavelet Transform (DWT)"
    }

    fn alpha(&self) -> f64 {
        self.config.alpha
    }

    fn watermark_shape(&self, image_shape: Shape) -> Shape {
        half_shape(image_shape)
    }

    fn encode(&self, image: &Image, watermark: &Mask, key: u64) -> Result<Encoded<()>> {
        self.config.validate()?;
        check_watermark_shape(self, image, watermark)?;
        check_even("image (even dimensions)", image)?;
        debug!(
            shape = ?shape_of(image),
            alpha = self.config.alpha,
            wavelet = %self.config.wavelet,
            key_mode = ?self.config.key_mode,
            "dwt encode"
        );

        let embedded = mask_to_f64(&self.config.key_mode.apply(watermark, key));
        let mut bands = self.engine.dwt2(image, self.config.wavelet)?;
        bands.ll += embedded * self.config.alpha;

        Ok(Encoded {
            image: self.engine.idwt2(&bands, self.config.wavelet)?,
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
        check_even("image (even dimensions)", original)?;
        debug!(
            shape = ?shape_of(original),
            alpha = self.config.alpha,
            wavelet = %self.config.wavelet,
            "dwt decode"
        );

        let ll_original = self.engine.dwt2(original, self.config.wavelet)?.ll;
        let ll_marked = self.engine.dwt2(watermarked, self.config.wavelet)?.ll;
        let estimate = (ll_marked - ll_original) / self.config.alpha;

        let mask = min_max_threshold(&estimate, 1)?;
        Ok(self.config.key_mode.restore(mask, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WatermarkError;
    use crate::transform::Wavelet;

    fn texture(rows: usize, cols: usize) -> Image {
        Image::from_fn(rows, cols, |r, c| ((r * r * 5 + c * 23 + 11) % 256) as f64)
    }

    fn pattern(rows: usize, cols: usize) -> Mask {
        Mask::from_fn(rows, cols, |r, c| ((r * 7 + c * 3) % 4 == 0) as u8)
    }

    #[test]
    fn roundtrip_each_wavelet() {
        let img = texture(16, 20);
        let wm = pattern(8, 10);
        for w in [Wavelet::Haar, Wavelet::Db2, Wavelet::Db4] {
            let codec = DwtCodec::new(CodecConfig::dwt().with_wavelet(w));
            let enc = codec.encode(&img, &wm, 0).unwrap();
            assert_eq!(enc.image.shape(), (16, 20));
            assert_eq!(codec.decode(&img, &enc.image, &(), 0).unwrap(), wm, "{w}");
        }
    }

    #[test]
    fn shape_check_requires_both_axes() {
        let codec = DwtCodec::default();
        let img = texture(8, 8);
        // One axis right, one wrong: still rejected.
        assert!(matches!(
            codec.encode(&img, &Mask::zeros(4, 3), 0),
            Err(WatermarkError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            codec.encode(&img, &Mask::zeros(8, 8), 0),
            Err(WatermarkError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn odd_image_rejected_as_shape_mismatch() {
        let codec = DwtCodec::default();
        let img = texture(9, 8);
        assert!(matches!(
            codec.encode(&img, &Mask::zeros(4, 4), 0),
            Err(WatermarkError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn identical_images_are_degenerate() {
        let codec = DwtCodec::default();
        let img = texture(8, 8);
        assert!(matches!(
            codec.decode(&img, &img, &(), 0),
            Err(WatermarkError::NumericDegeneracy { .. })
        ));
    }

    #[test]
    fn watermark_shape_is_half() {
        assert_eq!(DwtCodec::default().watermark_shape((512, 384)), (256, 192));
    }
}
