//! Inbound Ports (Driving Ports)
//!
//! The API a wallet uses to build filters and check what they catch.

use bitcoin::{Block, Transaction};

use crate::domain::{BloomFilter, FilteredBlock, MatchResult, WatchList};

/// Primary bloom filter API (Driving Port)
pub trait BloomFilterApi: Send + Sync {
    /// Build a filter holding every element of `watch_list`
    ///
    /// Sized for the list's element count with the service configuration's
    /// rate, update policy and tweak.
    fn build_filter(&self, watch_list: &WatchList) -> BloomFilter;

    /// Test a transaction, updating `filter` as its policy allows
    ///
    /// Tests in order:
    /// 1. Transaction id
    /// 2. Output script pushes (every output)
    /// 3. Spent outpoints and input script pushes, if nothing matched yet
    fn match_transaction(&self, filter: &mut BloomFilter, tx: &Transaction) -> MatchResult;

    /// Reduce a block to the transactions `filter` matches
    ///
    /// `None` for a block without transactions.
    fn filter_block(&self, filter: &mut BloomFilter, block: &Block) -> Option<FilteredBlock>;
}
