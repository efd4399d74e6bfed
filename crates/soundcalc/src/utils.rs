use p3_util::log2_ceil_usize;

use crate::error::{Result, SoundnessError};

/// Bits in one kibibyte.
pub const KIB: usize = 1024 * 8;

/// Returns the largest `k` such that `error <= 2^{-k}`.
///
/// Only defined for `error` in `(0, 1]`. Anything else means an error formula upstream produced a
/// value that is not a probability, and that is reported instead of clamped.
pub fn bits_of_security(error: f64) -> Result<u32> {
    if !(error > 0.0 && error <= 1.0) {
        return Err(SoundnessError::InvalidErrorProbability(error));
    }
    bits_of_security_from_log2(error.log2())
}

/// Same as [bits_of_security] for an error given as `log2(error)`.
///
/// Used for errors that underflow `f64` such as `(1 - theta)^num_queries` with many queries.
pub fn bits_of_security_from_log2(log2_error: f64) -> Result<u32> {
    if log2_error.is_nan() || log2_error == f64::NEG_INFINITY || log2_error > 0.0 {
        return Err(SoundnessError::InvalidErrorProbability(log2_error.exp2()));
    }
    Ok((-log2_error).floor() as u32)
}

/// Multiplies `error` by `2^{-grinding_bits}` (see section 6.3 of ethSTARK).
#[inline]
pub fn with_grinding(error: f64, grinding_bits: usize) -> f64 {
    error * 2.0_f64.powi(-(grinding_bits as i32))
}

/// `rho+ = (H + max_combo) / D`, see page 16 of [Ha22](https://eprint.iacr.org/2022/1216.pdf).
///
/// `max_combo` accounts for the extra opening points of the multi-point quotient.
pub fn rho_plus(trace_length: f64, domain_size: f64, max_combo: usize) -> f64 {
    (trace_length + max_combo as f64) / domain_size
}

/// Size of one Merkle opening: the leaf (a tuple of `tuple_size` field elements) plus the
/// authentication path of `ceil(log2(num_leaves))` hashes.
pub fn merkle_proof_bits(
    num_leaves: usize,
    tuple_size: usize,
    element_size_bits: usize,
    hash_size_bits: usize,
) -> usize {
    debug_assert!(num_leaves > 0);
    let leaf_bits = tuple_size * element_size_bits;
    let co_path_bits = log2_ceil_usize(num_leaves) * hash_size_bits;
    leaf_bits + co_path_bits
}

/// Worst-case size of `num_openings` openings into the same tree: every opening pays for its
/// full path, nothing is shared.
pub fn merkle_multi_proof_bits(
    num_leaves: usize,
    num_openings: usize,
    tuple_size: usize,
    element_size_bits: usize,
    hash_size_bits: usize,
) -> usize {
    num_openings * merkle_proof_bits(num_leaves, tuple_size, element_size_bits, hash_size_bits)
}

/// Expected size of a multi-proof for `num_openings` uniformly random leaves.
///
/// Leaves are paid once per distinct opened leaf. A node at depth `d` is part of the
/// multi-proof exactly when its own subtree holds no opened leaf but its sibling's does, which
/// happens with probability `(1 - 2^{-d})^q - (1 - 2^{1-d})^q`. There are `2^d` nodes at depth
/// `d`. The expectation never exceeds [merkle_multi_proof_bits].
pub fn expected_merkle_multi_proof_bits(
    num_leaves: usize,
    num_openings: usize,
    tuple_size: usize,
    element_size_bits: usize,
    hash_size_bits: usize,
) -> usize {
    debug_assert!(num_leaves > 0);
    let depth = log2_ceil_usize(num_leaves);
    let q = num_openings as i32;
    let width = (1usize << depth) as f64;

    let distinct_leaves = width * (1.0 - (1.0 - 1.0 / width).powi(q));
    let leaf_bits = distinct_leaves * (tuple_size * element_size_bits) as f64;

    let expected_hashes: f64 = (1..=depth)
        .map(|d| {
            let nodes = 2.0_f64.powi(d as i32);
            let p_empty = (1.0 - 2.0_f64.powi(-(d as i32))).powi(q);
            let p_parent_empty = (1.0 - 2.0_f64.powi(1 - d as i32)).powi(q);
            nodes * (p_empty - p_parent_empty)
        })
        .sum();

    let expected = leaf_bits + expected_hashes * hash_size_bits as f64;
    let worst = merkle_multi_proof_bits(
        num_leaves,
        num_openings,
        tuple_size,
        element_size_bits,
        hash_size_bits,
    );
    (expected.round() as usize).min(worst)
}

/// Transcript size of a sumcheck over `num_variables` variables with round polynomials of
/// `degree`: `degree + 2` evaluations per round plus the claimed sum and final evaluation.
pub fn sumcheck_size_bits(degree: usize, num_variables: usize, field_size_bits: usize) -> usize {
    (num_variables * (degree + 2) + 2) * field_size_bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_floor_log() {
        assert_eq!(bits_of_security(1.0).unwrap(), 0);
        assert_eq!(bits_of_security(0.5).unwrap(), 1);
        assert_eq!(bits_of_security(0.3).unwrap(), 1);
        assert_eq!(bits_of_security(2.0_f64.powi(-100)).unwrap(), 100);
        assert_eq!(bits_of_security(1e-40).unwrap(), 132);
    }

    #[test]
    fn bits_rejects_non_probabilities() {
        for e in [0.0, -0.1, 1.5, f64::NAN, f64::INFINITY] {
            assert!(bits_of_security(e).is_err(), "{e} accepted");
        }
        assert!(bits_of_security_from_log2(f64::NEG_INFINITY).is_err());
        assert!(bits_of_security_from_log2(0.25).is_err());
        assert_eq!(bits_of_security_from_log2(-1500.5).unwrap(), 1500);
    }

    #[test]
    fn grinding_adds_whole_bits() {
        for &e in &[0.3, 1e-12, 7.0e-30, 2.0_f64.powi(-57) * 3.0] {
            let base = bits_of_security(e).unwrap();
            for g in [1, 10, 20, 64] {
                assert_eq!(bits_of_security(with_grinding(e, g)).unwrap(), base + g as u32);
            }
        }
    }

    #[test]
    fn merkle_path_counts_depth_and_leaf() {
        assert_eq!(merkle_proof_bits(128, 3, 1, 1), 7 + 3);
        assert_eq!(merkle_proof_bits(1, 2, 64, 256), 128);
        assert_eq!(merkle_proof_bits(1 << 20, 4, 31, 256), 4 * 31 + 20 * 256);
    }

    #[test]
    fn expected_multi_proof_with_single_opening_is_exact() {
        assert_eq!(
            expected_merkle_multi_proof_bits(1 << 10, 1, 8, 31, 256),
            merkle_proof_bits(1 << 10, 8, 31, 256)
        );
    }

    #[test]
    fn expected_multi_proof_shares_siblings() {
        let worst = merkle_multi_proof_bits(1 << 12, 100, 4, 64, 256);
        let expected = expected_merkle_multi_proof_bits(1 << 12, 100, 4, 64, 256);
        assert!(expected < worst);
        // Opening every leaf of a tiny tree many times needs no hashes at all.
        let saturated = expected_merkle_multi_proof_bits(4, 1000, 1, 1, 256);
        assert_eq!(saturated, 4);
    }

    #[test]
    fn sumcheck_transcript() {
        assert_eq!(sumcheck_size_bits(2, 10, 1), 42);
    }
}
