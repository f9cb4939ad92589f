//! Helper for computing frame checksums.

/// Compute the checksum of a payload: the ones' complement of its 8-bit sum.
pub fn compute_checksum(r: &[u8]) -> u8 {
    !r.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}
