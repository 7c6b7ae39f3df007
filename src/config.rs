// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Codec configuration.

use tracing::debug;

use crate::error::{Result, WatermarkError};
use crate::image::Mask;
use crate::scramble;
use crate::transform::Wavelet;

/// Default embedding strength for the DCT scheme.
pub const DEFAULT_DCT_ALPHA: f64 = 0.01;

/// Default embedding strength for the DWT scheme.
pub const DEFAULT_DWT_ALPHA: f64 = 0.1;

/// Default embedding strength for the DWT+SVD scheme.
pub const DEFAULT_DWT_SVD_ALPHA: f64 = 0.1;

/// How the `key` argument of encode/decode is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyMode {
    /// The key is accepted and ignored; output is identical for every key.
    #[default]
    Inert,
    /// The watermark is permuted with a key-seeded shuffle before embedding
    /// and the extracted mask is permuted back. Decoding needs the same key.
    Scrambled,
}

impl KeyMode {
    /// Prepare a watermark for embedding.
    pub fn apply(self, watermark: &Mask, key: u64) -> Mask {
        match self {
            Self::Inert => watermark.clone(),
            Self::Scrambled => {
                debug!(key, "scrambling watermark");
                scramble::scramble(watermark, key)
            }
        }
    }

    /// Undo [`apply`](Self::apply) on an extracted mask.
    pub fn restore(self, mask: Mask, key: u64) -> Mask {
        match self {
            Self::Inert => mask,
            Self::Scrambled => scramble::unscramble(&mask, key),
        }
    }
}

/// Parameters shared by every codec. The DCT scheme ignores `wavelet`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodecConfig {
    /// Embedding strength. Larger is more robust and more visible.
    pub alpha: f64,
    pub wavelet: Wavelet,
    pub key_mode: KeyMode,
}

impl CodecConfig {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, wavelet: Wavelet::Haar, key_mode: KeyMode::Inert }
    }

    /// Defaults for the DCT scheme.
    pub fn dct() -> Self {
        Self::new(DEFAULT_DCT_ALPHA)
    }

    /// Defaults for the DWT scheme.
    pub fn dwt() -> Self {
        Self::new(DEFAULT_DWT_ALPHA)
    }

    /// Defaults for the DWT+SVD scheme.
    pub fn dwt_svd() -> Self {
        Self::new(DEFAULT_DWT_SVD_ALPHA)
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_wavelet(mut self, wavelet: Wavelet) -> Self {
        self.wavelet = wavelet;
        self
    }

    pub fn with_key_mode(mut self, key_mode: KeyMode) -> Self {
        self.key_mode = key_mode;
        self
    }

    /// Check that decode's division by alpha is defined.
    ///
    /// # Errors
    /// [`WatermarkError::Configuration`] if `alpha == 0`.
    pub fn validate(&self) -> Result<()> {
        if self.alpha == 0.0 {
            return Err(WatermarkError::Configuration(
                "scaling factor alpha must be nonzero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_defaults() {
        assert_eq!(CodecConfig::dct().alpha, 0.01);
        assert_eq!(CodecConfig::dwt().alpha, 0.1);
        assert_eq!(CodecConfig::dwt_svd().wavelet, Wavelet::Haar);
        assert_eq!(CodecConfig::dwt().key_mode, KeyMode::Inert);
    }

    #[test]
    fn zero_alpha_rejected() {
        assert!(CodecConfig::new(0.0).validate().is_err());
        assert!(CodecConfig::new(-0.0).validate().is_err());
        assert!(CodecConfig::new(0.5).validate().is_ok());
        assert!(CodecConfig::new(-0.5).validate().is_ok());
    }

    #[test]
    fn builder_chain() {
        let c = CodecConfig::dwt()
            .with_alpha(2.0)
            .with_wavelet(Wavelet::Db4)
            .with_key_mode(KeyMode::Scrambled);
        assert_eq!(c.alpha, 2.0);
        assert_eq!(c.wavelet, Wavelet::Db4);
        assert_eq!(c.key_mode, KeyMode::Scrambled);
    }

    #[test]
    fn inert_mode_ignores_key() {
        let wm = Mask::from_fn(4, 4, |r, c| ((r + c) % 2) as u8);
        assert_eq!(KeyMode::Inert.apply(&wm, 1), KeyMode::Inert.apply(&wm, 2));
        assert_eq!(KeyMode::Inert.apply(&wm, 1), wm);
    }

    #[test]
    fn scrambled_mode_restores() {
        let wm = Mask::from_fn(6, 6, |r, c| ((r * 3 + c) % 5 == 0) as u8);
        let s = KeyMode::Scrambled.apply(&wm, 77);
        assert_eq!(KeyMode::Scrambled.restore(s, 77), wm);
    }
}
