//! BIP37 connection bloom filter
//!
//! INVARIANTS:
//! - INVARIANT-1: bit field <= 36,000 bytes and hash functions <= 50 for any
//!   filter built by [`BloomFilter::new`]
//! - INVARIANT-2: No false negatives - after `add(x)`, `matches(x)` MUST return true
//! - INVARIANT-3: Size and hash count never change after construction or load;
//!   only whole-filter replacement (`reload`) changes them

use bitcoin::hashes::Hash;
use bitcoin::p2p::message_bloom::{BloomFlags, FilterLoad};
use bitcoin::{OutPoint, Txid};
use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use super::hash_functions::compute_hash_positions;
use super::parameters::calculate_filter_params;

/// Outpoint serialization length: 32 byte txid + 4 byte index
pub const OUTPOINT_SERIALIZED_SIZE: usize = 36;

/// Policy for inserting matched outpoints back into the filter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloomUpdate {
    /// Never insert outpoints
    #[default]
    None,
    /// Insert the outpoint of every matching output
    All,
    /// Insert only when the output pays to a bare public key or multisig
    P2PubkeyOnly,
}

impl From<BloomFlags> for BloomUpdate {
    fn from(flags: BloomFlags) -> Self {
        match flags {
            BloomFlags::None => BloomUpdate::None,
            BloomFlags::All => BloomUpdate::All,
            BloomFlags::PubkeyOnly => BloomUpdate::P2PubkeyOnly,
        }
    }
}

impl From<BloomUpdate> for BloomFlags {
    fn from(update: BloomUpdate) -> Self {
        match update {
            BloomUpdate::None => BloomFlags::None,
            BloomUpdate::All => BloomFlags::All,
            BloomUpdate::P2PubkeyOnly => BloomFlags::PubkeyOnly,
        }
    }
}

/// Serialize an outpoint the way it is hashed into the filter
pub fn outpoint_bytes(outpoint: &OutPoint) -> [u8; OUTPOINT_SERIALIZED_SIZE] {
    let mut buf = [0u8; OUTPOINT_SERIALIZED_SIZE];
    buf[..32].copy_from_slice(outpoint.txid.as_byte_array());
    buf[32..].copy_from_slice(&outpoint.vout.to_le_bytes());
    buf
}

/// Bloom filter a light client loads into a full node's connection
///
/// A filter is either loaded (it has parameters and a possibly empty bit
/// field) or unloaded (it matches nothing). The filter does no locking; its
/// owner serializes access.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BloomFilter {
    /// Bit array, bit `i` is bit `i % 8` of byte `i / 8`
    bits: BitVec<u8, Lsb0>,
    /// Number of hash functions (k)
    hash_funcs: u32,
    /// Seed offset chosen by the filter's creator
    tweak: u32,
    /// Outpoint auto-update policy
    flags: BloomUpdate,
    /// Whether the filter holds parameters at all
    loaded: bool,
}

impl BloomFilter {
    /// Create a filter sized for `elements` items at `false_positive_rate`
    ///
    /// Never fails: the rate is clamped into `[1e-9, 1.0]`, the element count
    /// is raised to at least one, and size and hash count saturate at the
    /// protocol maxima.
    pub fn new(elements: u32, tweak: u32, false_positive_rate: f64, flags: BloomUpdate) -> Self {
        let params = calculate_filter_params(elements, false_positive_rate);
        Self {
            bits: bitvec![u8, Lsb0; 0; params.size_bytes as usize * 8],
            hash_funcs: params.hash_funcs,
            tweak,
            flags,
            loaded: true,
        }
    }

    /// Reconstitute a filter from a `filterload` payload, copying it verbatim
    ///
    /// Bounds are not checked here; the protocol layer rejects oversized
    /// payloads before they reach the filter.
    pub fn load(msg: &FilterLoad) -> Self {
        Self {
            bits: BitVec::from_vec(msg.filter.clone()),
            hash_funcs: msg.hash_funcs,
            tweak: msg.tweak,
            flags: msg.flags.into(),
            loaded: true,
        }
    }

    /// Filter in the unloaded state
    pub fn unloaded() -> Self {
        Self::default()
    }

    /// Whether the filter currently holds a bit field
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Clear the filter to the unloaded state
    pub fn unload(&mut self) {
        *self = Self::unloaded();
    }

    /// Replace the filter with `msg`, or unload it when `msg` is `None`
    pub fn reload(&mut self, msg: Option<&FilterLoad>) {
        match msg {
            Some(msg) => *self = Self::load(msg),
            None => self.unload(),
        }
    }

    /// Insert raw bytes
    ///
    /// After insertion, `matches(data)` is guaranteed to return true.
    /// No-op on an unloaded or zero-length filter.
    pub fn add(&mut self, data: &[u8]) {
        if !self.loaded || self.bits.is_empty() {
            return;
        }
        let size_bits = self.bits.len();
        for pos in compute_hash_positions(data, self.hash_funcs, self.tweak, size_bits) {
            self.bits.set(pos, true);
        }
    }

    /// Test raw bytes
    ///
    /// - unloaded: always `false`
    /// - loaded with a zero-length bit field: always `true`
    /// - otherwise `true` iff every derived bit is set
    pub fn matches(&self, data: &[u8]) -> bool {
        if !self.loaded {
            return false;
        }
        if self.bits.is_empty() {
            return true;
        }
        compute_hash_positions(data, self.hash_funcs, self.tweak, self.bits.len())
            .all(|pos| self.bits[pos])
    }

    /// Insert the raw bytes of a transaction hash
    pub fn add_hash(&mut self, hash: &Txid) {
        self.add(hash.as_byte_array());
    }

    /// Test the raw bytes of a transaction hash
    pub fn matches_hash(&self, hash: &Txid) -> bool {
        self.matches(hash.as_byte_array())
    }

    /// Insert a serialized outpoint
    pub fn add_outpoint(&mut self, outpoint: &OutPoint) {
        self.add(&outpoint_bytes(outpoint));
    }

    /// Test a serialized outpoint
    pub fn matches_outpoint(&self, outpoint: &OutPoint) -> bool {
        self.matches(&outpoint_bytes(outpoint))
    }

    /// The `filterload` payload describing this filter, `None` when unloaded
    pub fn msg_filter_load(&self) -> Option<FilterLoad> {
        if !self.loaded {
            return None;
        }
        Some(FilterLoad {
            filter: self.bits.as_raw_slice().to_vec(),
            hash_funcs: self.hash_funcs,
            tweak: self.tweak,
            flags: self.flags.into(),
        })
    }

    /// Consensus-encoded `filterload` payload, `None` when unloaded
    pub fn serialize(&self) -> Option<Vec<u8>> {
        self.msg_filter_load()
            .map(|msg| bitcoin::consensus::encode::serialize(&msg))
    }

    /// Bit field length in bytes
    pub fn size_bytes(&self) -> usize {
        self.bits.as_raw_slice().len()
    }

    /// Bit field length in bits
    pub fn size_bits(&self) -> usize {
        self.bits.len()
    }

    /// Number of hash functions
    pub fn hash_funcs(&self) -> u32 {
        self.hash_funcs
    }

    /// Hash seed offset
    pub fn tweak(&self) -> u32 {
        self.tweak
    }

    /// Outpoint auto-update policy
    pub fn flags(&self) -> BloomUpdate {
        self.flags
    }

    /// Number of bits set
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }
}
