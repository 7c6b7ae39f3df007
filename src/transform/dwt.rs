// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Single-level 2D discrete wavelet transform.
//!
//! Uses an orthogonal two-channel filter bank with periodic extension, so a
//! length-`n` line splits into exactly `n/2` approximation and `n/2` detail
//! coefficients and reconstruction is the transpose of analysis. Inputs must
//! have even dimensions.
//!
//! 1D analysis for low-pass `h` and high-pass `g`:
//!   a[k] = Σ_j h[j] · x[(2k + j) mod n]
//!   d[k] = Σ_j g[j] · x[(2k + j) mod n]
//! with the QMF relation `g[j] = (-1)^j · h[L-1-j]`.
//!
//! 2D: rows first (horizontal split), then columns of each half.

use std::fmt;
use std::str::FromStr;

use nalgebra::DMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Result, WatermarkError};
use crate::image::{ensure_shape, shape_of, Image};

/// Haar (db1) scaling filter.
const HAAR: [f64; 2] = [std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2];

/// Daubechies 2 (4 taps) scaling filter.
const DB2: [f64; 4] = [
    0.48296291314469025,
    0.836516303737469,
    0.22414386804185735,
    -0.12940952255092145,
];

/// Daubechies 4 (8 taps) scaling filter.
const DB4: [f64; 8] = [
    0.23037781330885523,
    0.7148465705525415,
    0.6308807679295904,
    -0.02798376941698385,
    -0.18703481171888114,
    0.030841381835986965,
    0.032883011666982945,
    -0.010597401784997278,
];

/// Supported wavelet families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wavelet {
    #[default]
    Haar,
    Db2,
    Db4,
}

impl Wavelet {
    /// Canonical short name (`"haar"`, `"db2"`, `"db4"`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Haar => "haar",
            Self::Db2 => "db2",
            Self::Db4 => "db4",
        }
    }

    /// Low-pass decomposition filter.
    pub fn lowpass(self) -> &'static [f64] {
        match self {
            Self::Haar => &HAAR,
            Self::Db2 => &DB2,
            Self::Db4 => &DB4,
        }
    }

    /// High-pass decomposition filter derived by the QMF relation.
    pub fn highpass(self) -> Vec<f64> {
        let lo = self.lowpass();
        let len = lo.len();
        (0..len)
            .map(|n| {
                let sign = if n % 2 == 0 { 1.0 } else { -1.0 };
                sign * lo[len - 1 - n]
            })
            .collect()
    }
}

impl fmt::Display for Wavelet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Wavelet {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "haar" | "db1" => Ok(Self::Haar),
            "db2" => Ok(Self::Db2),
            "db4" => Ok(Self::Db4),
            other => Err(WatermarkError::Configuration(format!("unknown wavelet family: {other}"))),
        }
    }
}

/// The four subbands of a single-level decomposition.
///
/// The first letter names the horizontal (along-row) filter, the second the
/// vertical one: `lh` is low-pass across columns and high-pass down rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Subbands {
    /// Approximation (low/low); the embedding target.
    pub ll: Image,
    pub lh: Image,
    pub hl: Image,
    pub hh: Image,
}

impl Subbands {
    /// `(rows, cols)` of each subband.
    pub fn shape(&self) -> (usize, usize) {
        shape_of(&self.ll)
    }
}

/// Analyze one line into approximation and detail halves.
fn analyze_line(x: &[f64], h: &[f64], g: &[f64], lo: &mut [f64], hi: &mut [f64]) {
    let n = x.len();
    for k in 0..n / 2 {
        let mut a = 0.0;
        let mut d = 0.0;
        for (j, (&hj, &gj)) in h.iter().zip(g.iter()).enumerate() {
            let v = x[(2 * k + j) % n];
            a += hj * v;
            d += gj * v;
        }
        lo[k] = a;
        hi[k] = d;
    }
}

/// Inverse of [`analyze_line`]: scatter both halves back onto `out`.
fn synthesize_line(lo: &[f64], hi: &[f64], h: &[f64], g: &[f64], out: &mut [f64]) {
    let n = out.len();
    out.fill(0.0);
    for k in 0..lo.len() {
        for (j, (&hj, &gj)) in h.iter().zip(g.iter()).enumerate() {
            out[(2 * k + j) % n] += hj * lo[k] + gj * hi[k];
        }
    }
}

/// Split every row of `m` into (approximation, detail) matrices of half width.
fn analyze_rows(m: &Image, wavelet: Wavelet) -> (Image, Image) {
    let (rows, cols) = shape_of(m);
    let half = cols / 2;
    if rows == 0 || half == 0 {
        return (Image::zeros(rows, half), Image::zeros(rows, half));
    }

    let h = wavelet.lowpass();
    let g = wavelet.highpass();

    // Column-major storage of the transpose is row-major storage of `m`.
    let data = m.transpose();
    let mut lo = vec![0.0f64; rows * half];
    let mut hi = vec![0.0f64; rows * half];

    #[cfg(feature = "parallel")]
    data.as_slice()
        .par_chunks(cols)
        .zip(lo.par_chunks_mut(half))
        .zip(hi.par_chunks_mut(half))
        .for_each(|((src, dl), dh)| analyze_line(src, h, &g, dl, dh));

    #[cfg(not(feature = "parallel"))]
    data.as_slice()
        .chunks(cols)
        .zip(lo.chunks_mut(half))
        .zip(hi.chunks_mut(half))
        .for_each(|((src, dl), dh)| analyze_line(src, h, &g, dl, dh));

    (
        DMatrix::from_row_slice(rows, half, &lo),
        DMatrix::from_row_slice(rows, half, &hi),
    )
}

/// Merge row-wise approximation and detail matrices into full-width rows.
fn synthesize_rows(lo: &Image, hi: &Image, wavelet: Wavelet) -> Image {
    let (rows, half) = shape_of(lo);
    let cols = half * 2;
    if rows == 0 || half == 0 {
        return Image::zeros(rows, cols);
    }

    let h = wavelet.lowpass();
    let g = wavelet.highpass();

    let lo_rows = lo.transpose();
    let hi_rows = hi.transpose();
    let mut out = vec![0.0f64; rows * cols];

    #[cfg(feature = "parallel")]
    out.par_chunks_mut(cols)
        .zip(lo_rows.as_slice().par_chunks(half))
        .zip(hi_rows.as_slice().par_chunks(half))
        .for_each(|((dst, l), d)| synthesize_line(l, d, h, &g, dst));

    #[cfg(not(feature = "parallel"))]
    out.chunks_mut(cols)
        .zip(lo_rows.as_slice().chunks(half))
        .zip(hi_rows.as_slice().chunks(half))
        .for_each(|((dst, l), d)| synthesize_line(l, d, h, &g, dst));

    DMatrix::from_row_slice(rows, cols, &out)
}

/// Single-level 2D decomposition of `m` into [`Subbands`].
///
/// # Errors
/// [`WatermarkError::Transform`] if either dimension is odd.
pub fn decompose(m: &Image, wavelet: Wavelet) -> Result<Subbands> {
    let (rows, cols) = shape_of(m);
    if rows % 2 != 0 || cols % 2 != 0 {
        return Err(WatermarkError::Transform("wavelet decomposition needs even dimensions"));
    }

    let (low, high) = analyze_rows(m, wavelet);
    let (ll, lh) = analyze_rows(&low.transpose(), wavelet);
    let (hl, hh) = analyze_rows(&high.transpose(), wavelet);

    Ok(Subbands {
        ll: ll.transpose(),
        lh: lh.transpose(),
        hl: hl.transpose(),
        hh: hh.transpose(),
    })
}

/// Reconstruct the image from its four subbands.
///
/// # Errors
/// [`WatermarkError::ShapeMismatch`] if the subbands differ in shape.
pub fn reconstruct(bands: &Subbands, wavelet: Wavelet) -> Result<Image> {
    let shape = bands.shape();
    ensure_shape("lh subband vs ll subband", shape, shape_of(&bands.lh))?;
    ensure_shape("hl subband vs ll subband", shape, shape_of(&bands.hl))?;
    ensure_shape("hh subband vs ll subband", shape, shape_of(&bands.hh))?;

    let low = synthesize_rows(&bands.ll.transpose(), &bands.lh.transpose(), wavelet).transpose();
    let high = synthesize_rows(&bands.hl.transpose(), &bands.hh.transpose(), wavelet).transpose();
    Ok(synthesize_rows(&low, &high, wavelet))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Wavelet; 3] = [Wavelet::Haar, Wavelet::Db2, Wavelet::Db4];

    fn texture(rows: usize, cols: usize) -> Image {
        Image::from_fn(rows, cols, |r, c| ((r * 37 + c * c * 11 + 5) % 251) as f64)
    }

    #[test]
    fn filters_are_normalized() {
        for w in ALL {
            let lo = w.lowpass();
            let sum: f64 = lo.iter().sum();
            let energy: f64 = lo.iter().map(|v| v * v).sum();
            assert!((sum - std::f64::consts::SQRT_2).abs() < 1e-12, "{w}: sum {sum}");
            assert!((energy - 1.0).abs() < 1e-12, "{w}: energy {energy}");
            let hi_sum: f64 = w.highpass().iter().sum();
            assert!(hi_sum.abs() < 1e-12, "{w}: highpass sum {hi_sum}");
        }
    }

    #[test]
    fn haar_ll_is_half_block_sum() {
        let img = texture(4, 6);
        let bands = decompose(&img, Wavelet::Haar).unwrap();
        assert_eq!(bands.shape(), (2, 3));
        for r in 0..2 {
            for c in 0..3 {
                let sum = img[(2 * r, 2 * c)]
                    + img[(2 * r, 2 * c + 1)]
                    + img[(2 * r + 1, 2 * c)]
                    + img[(2 * r + 1, 2 * c + 1)];
                assert!((bands.ll[(r, c)] - sum / 2.0).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn roundtrip_all_families() {
        for w in ALL {
            for (rows, cols) in [(2, 2), (8, 8), (10, 6), (16, 12)] {
                let img = texture(rows, cols);
                let bands = decompose(&img, w).unwrap();
                assert_eq!(bands.shape(), (rows / 2, cols / 2));
                let back = reconstruct(&bands, w).unwrap();
                for (a, b) in img.iter().zip(back.iter()) {
                    assert!((a - b).abs() < 1e-9, "{w} {rows}x{cols}: {a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn flat_image_has_no_detail() {
        let img = Image::from_element(8, 8, 42.0);
        for w in ALL {
            let bands = decompose(&img, w).unwrap();
            for band in [&bands.lh, &bands.hl, &bands.hh] {
                assert!(band.iter().all(|v| v.abs() < 1e-10), "{w}");
            }
            // Each LL cell carries 2x the mean for an orthonormal 2D split.
            assert!(bands.ll.iter().all(|v| (v - 84.0).abs() < 1e-9), "{w}");
        }
    }

    #[test]
    fn energy_is_preserved() {
        let img = texture(12, 8);
        for w in ALL {
            let b = decompose(&img, w).unwrap();
            let e_in: f64 = img.iter().map(|v| v * v).sum();
            let e_out: f64 = [&b.ll, &b.lh, &b.hl, &b.hh]
                .iter()
                .map(|m| m.iter().map(|v| v * v).sum::<f64>())
                .sum();
            assert!((e_in - e_out).abs() / e_in < 1e-12, "{w}");
        }
    }

    #[test]
    fn odd_dimensions_rejected() {
        let img = texture(7, 8);
        assert!(matches!(decompose(&img, Wavelet::Haar), Err(WatermarkError::Transform(_))));
        let img = texture(8, 5);
        assert!(matches!(decompose(&img, Wavelet::Haar), Err(WatermarkError::Transform(_))));
    }

    #[test]
    fn mismatched_subbands_rejected() {
        let mut bands = decompose(&texture(8, 8), Wavelet::Haar).unwrap();
        bands.hh = Image::zeros(3, 4);
        assert!(matches!(
            reconstruct(&bands, Wavelet::Haar),
            Err(WatermarkError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn wavelet_names_parse() {
        assert_eq!("haar".parse::<Wavelet>().unwrap(), Wavelet::Haar);
        assert_eq!("db1".parse::<Wavelet>().unwrap(), Wavelet::Haar);
        assert_eq!("DB2".parse::<Wavelet>().unwrap(), Wavelet::Db2);
        assert_eq!("db4".parse::<Wavelet>().unwrap(), Wavelet::Db4);
        assert!(matches!("sym5".parse::<Wavelet>(), Err(WatermarkError::Configuration(_))));
        for w in ALL {
            assert_eq!(w.to_string().parse::<Wavelet>().unwrap(), w);
        }
    }
}
