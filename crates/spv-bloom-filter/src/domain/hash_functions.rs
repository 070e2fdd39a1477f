//! Hash functions for the BIP37 filter
//!
//! Each of the `k` hash functions is MurmurHash3 (x86, 32-bit) with its own
//! seed: `i * 0xFBA4C795 + tweak`, computed with wrapping `u32` arithmetic.
//! Peers derive bit positions the same way, so none of this may change.

use std::io::Cursor;

/// Multiplier separating the seeds of consecutive hash functions
pub const SEED_MULTIPLIER: u32 = 0xFBA4_C795;

/// MurmurHash3 x86 32-bit
pub fn murmur3_x86_32(data: &[u8], seed: u32) -> u32 {
    let mut cursor = Cursor::new(data);
    // reading from an in-memory cursor cannot fail
    murmur3::murmur3_32(&mut cursor, seed).unwrap_or(0)
}

/// Seed for hash function number `hash_index` of a filter with `tweak`
pub fn hash_seed(hash_index: u32, tweak: u32) -> u32 {
    hash_index.wrapping_mul(SEED_MULTIPLIER).wrapping_add(tweak)
}

/// Bit position selected by hash function `hash_index` in a field of
/// `size_bits` bits. `size_bits` must be non-zero.
pub fn bit_index(data: &[u8], hash_index: u32, tweak: u32, size_bits: usize) -> usize {
    let hash = murmur3_x86_32(data, hash_seed(hash_index, tweak));
    hash as usize % size_bits
}

/// All `hash_funcs` bit positions for `data`
pub fn compute_hash_positions(
    data: &[u8],
    hash_funcs: u32,
    tweak: u32,
    size_bits: usize,
) -> impl Iterator<Item = usize> + '_ {
    (0..hash_funcs).map(move |i| bit_index(data, i, tweak, size_bits))
}
