//! Chunk fingerprint
//!
//! A weighted sum over the chunk bytes: byte `i` is multiplied by `2^i` and
//! the products are added with wrapping 64-bit arithmetic. Weights for
//! `i >= 64` overflow to zero, so only the first 64 bytes influence the
//! value.
//!
//! This is not collision resistant. Matching fingerprints only say two
//! chunks *may* be equal; callers confirm with a byte comparison.

/// Compute the fingerprint of `data`
pub fn fingerprint(data: &[u8]) -> u64 {
    data.iter()
        .take(u64::BITS as usize)
        .enumerate()
        .fold(0u64, |hash, (i, &byte)| {
            hash.wrapping_add((byte as u64).wrapping_shl(i as u32))
        })
}
