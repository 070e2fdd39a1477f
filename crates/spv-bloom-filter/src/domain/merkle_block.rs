//! Filtered blocks (`merkleblock`)
//!
//! A block is reduced to its header plus a partial merkle tree proving the
//! inclusion of the transactions the peer's filter matched.

use bitcoin::merkle_tree::{MerkleBlock, PartialMerkleTree};
use bitcoin::{Block, Txid};

use super::bloom_filter::BloomFilter;
use super::matcher::match_transaction;
use super::script::ScriptClassifier;

/// A block filtered against a peer's filter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilteredBlock {
    /// Header and partial merkle tree
    pub merkle_block: MerkleBlock,
    /// Positions in the block of the matched transactions, ascending
    pub matched_indices: Vec<u32>,
}

impl FilteredBlock {
    /// Ids of the matched transactions, in block order
    pub fn matched_txids(&self, block: &Block) -> Vec<Txid> {
        self.matched_indices
            .iter()
            .filter_map(|&index| block.txdata.get(index as usize))
            .map(|tx| tx.compute_txid())
            .collect()
    }

    /// Number of matched transactions
    pub fn matched_count(&self) -> usize {
        self.matched_indices.len()
    }
}

/// Match every transaction of `block` in order and build its `merkleblock`
///
/// The filter is updated as it goes, so an output tracked while matching an
/// earlier transaction catches a later spend within the same block.
/// Returns `None` for a block without transactions, which has no merkle tree.
pub fn filtered_block<C: ScriptClassifier + ?Sized>(
    filter: &mut BloomFilter,
    block: &Block,
    classifier: &C,
) -> Option<FilteredBlock> {
    if block.txdata.is_empty() {
        return None;
    }

    let mut txids = Vec::with_capacity(block.txdata.len());
    let mut matches = Vec::with_capacity(block.txdata.len());
    let mut matched_indices = Vec::new();

    for (index, tx) in block.txdata.iter().enumerate() {
        let matched = match_transaction(filter, tx, classifier).matches;
        if matched {
            matched_indices.push(index as u32);
        }
        txids.push(tx.compute_txid());
        matches.push(matched);
    }

    Some(FilteredBlock {
        merkle_block: MerkleBlock {
            header: block.header,
            txn: PartialMerkleTree::from_txids(&txids, &matches),
        },
        matched_indices,
    })
}
