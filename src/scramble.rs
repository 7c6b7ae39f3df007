// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Keyed watermark scrambling.
//!
//! Permutes the cells of a watermark with a Fisher-Yates shuffle driven by a
//! ChaCha20 PRNG. The seed is SHA-256 over a domain tag and the key, so the
//! encoder and decoder rebuild the same permutation from the same key and
//! the embedding pattern is not recoverable without it.
//!
//! # Cross-platform portability
//!
//! The shuffle uses `u32` for `gen_range` (not `usize`). `usize` is 32-bit on
//! WASM but 64-bit on native, and `gen_range` consumes a different amount of
//! PRNG output per step for each, which would produce different shuffles.

use nalgebra::{DMatrix, Scalar};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

/// Domain separation tag for seed derivation.
const SEED_DOMAIN: &[u8] = b"wavemark/scramble/v1";

/// Derive the 32-byte PRNG seed for `key`.
pub fn derive_seed(key: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(SEED_DOMAIN);
    hasher.update(key.to_le_bytes());
    hasher.finalize().into()
}

/// Permutation of `0..len` for `key`: cell `i` of the scrambled matrix is
/// cell `perm[i]` of the original.
pub fn permutation(len: usize, key: u64) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..len).collect();
    let mut rng = ChaCha20Rng::from_seed(derive_seed(key));
    for i in (1..len).rev() {
        let j = rng.gen_range(0..=(i as u32)) as usize;
        perm.swap(i, j);
    }
    perm
}

/// Scramble the cells of `m` (column-major order), keeping its shape.
pub fn scramble<T: Scalar + Copy>(m: &DMatrix<T>, key: u64) -> DMatrix<T> {
    let src = m.as_slice();
    let perm = permutation(src.len(), key);
    let data: Vec<T> = perm.iter().map(|&p| src[p]).collect();
    DMatrix::from_vec(m.nrows(), m.ncols(), data)
}

/// Inverse of [`scramble`].
pub fn unscramble<T: Scalar + Copy>(m: &DMatrix<T>, key: u64) -> DMatrix<T> {
    let src = m.as_slice();
    let perm = permutation(src.len(), key);
    let mut data = src.to_vec();
    for (i, &p) in perm.iter().enumerate() {
        data[p] = src[i];
    }
    DMatrix::from_vec(m.nrows(), m.ncols(), data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting(rows: usize, cols: usize) -> DMatrix<u8> {
        DMatrix::from_fn(rows, cols, |r, c| (r * cols + c) as u8)
    }

    #[test]
    fn deterministic() {
        assert_eq!(permutation(100, 42), permutation(100, 42));
    }

    #[test]
    fn permutation_covers_every_index() {
        let mut perm = permutation(257, 7);
        perm.sort_unstable();
        assert_eq!(perm, (0..257).collect::<Vec<_>>());
    }

    #[test]
    fn different_keys_differ() {
        assert_ne!(permutation(64, 1), permutation(64, 2));
    }

    #[test]
    fn seed_depends_on_key() {
        assert_ne!(derive_seed(0), derive_seed(1));
        assert_eq!(derive_seed(99), derive_seed(99));
    }

    #[test]
    fn scramble_then_unscramble_restores() {
        let m = counting(6, 10);
        let s = scramble(&m, 1234);
        assert_eq!(s.shape(), m.shape());
        assert_ne!(s, m);
        assert_eq!(unscramble(&s, 1234), m);
    }

    #[test]
    fn wrong_key_does_not_restore() {
        let m = counting(8, 8);
        let s = scramble(&m, 5);
        assert_ne!(unscramble(&s, 6), m);
    }

    #[test]
    fn tiny_matrices_unchanged() {
        let empty: DMatrix<u8> = DMatrix::zeros(0, 3);
        assert_eq!(scramble(&empty, 9), empty);
        let single = DMatrix::from_element(1, 1, 7u8);
        assert_eq!(scramble(&single, 9), single);
    }
}
