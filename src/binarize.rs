// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Turning continuous watermark estimates into binary masks.

use tracing::warn;

use crate::error::{Result, WatermarkError};
use crate::image::{Image, Mask};

/// Normalized values strictly above this become the "on" value.
pub const THRESHOLD: f64 = 0.5;

/// Largest value range still treated as flat by [`min_max_threshold`].
/// Absorbs the floating-point residue of transform round trips.
pub const DEGENERATE_RANGE: f64 = 1e-9;

/// `round(clip(v, 0, 1))` per cell.
pub fn round_clip(estimate: &Image) -> Mask {
    estimate.map(|v| v.clamp(0.0, 1.0).round() as u8)
}

/// Min-max normalize `estimate` to [0, 1] over the whole matrix, then map
/// cells above [`THRESHOLD`] to `on` and the rest to 0.
///
/// # Errors
/// [`WatermarkError::NumericDegeneracy`] if the values span no more than
/// [`DEGENERATE_RANGE`].
pub fn min_max_threshold(estimate: &Image, on: u8) -> Result<Mask> {
    if estimate.is_empty() {
        return Ok(Mask::zeros(estimate.nrows(), estimate.ncols()));
    }

    let (min, max) = estimate
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;
    if !(range > DEGENERATE_RANGE) {
        warn!(min, max, "difference matrix has no dynamic range");
        return Err(WatermarkError::NumericDegeneracy { value: min });
    }

    Ok(estimate.map(|v| if (v - min) / range > THRESHOLD { on } else { 0 }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_clip_saturates() {
        let est = Image::from_row_slice(1, 6, &[-2.0, 0.2, 0.49, 0.51, 0.98, 7.5]);
        assert_eq!(round_clip(&est).as_slice(), &[0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn threshold_is_relative() {
        // Absolute scale is discarded: only ordering within the range matters.
        let est = Image::from_row_slice(1, 4, &[100.0, 100.2, 100.8, 101.0]);
        assert_eq!(min_max_threshold(&est, 1).unwrap().as_slice(), &[0, 0, 1, 1]);
        assert_eq!(min_max_threshold(&est, 255).unwrap().as_slice(), &[0, 0, 255, 255]);
    }

    #[test]
    fn midpoint_maps_to_zero() {
        let est = Image::from_row_slice(1, 3, &[0.0, 0.5, 1.0]);
        assert_eq!(min_max_threshold(&est, 1).unwrap().as_slice(), &[0, 0, 1]);
    }

    #[test]
    fn flat_input_is_degenerate() {
        let est = Image::from_element(3, 3, 4.0);
        assert_eq!(
            min_max_threshold(&est, 1),
            Err(WatermarkError::NumericDegeneracy { value: 4.0 })
        );
    }

    #[test]
    fn residue_below_tolerance_is_degenerate() {
        let est = Image::from_row_slice(1, 3, &[0.0, 1e-12, -1e-12]);
        assert!(matches!(
            min_max_threshold(&est, 1),
            Err(WatermarkError::NumericDegeneracy { .. })
        ));
    }

    #[test]
    fn empty_estimate_gives_empty_mask() {
        let est = Image::zeros(0, 0);
        assert_eq!(min_max_threshold(&est, 1).unwrap().shape(), (0, 0));
    }
}
