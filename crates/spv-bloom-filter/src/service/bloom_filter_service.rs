//! Bloom Filter Service
//!
//! Wallet-side orchestration: builds filters from a watch list and matches
//! transactions and blocks with an injected script classifier.

use std::sync::Arc;

use bitcoin::{Block, Transaction};
use tracing::debug;

use crate::domain::{
    calculate_fpr, filtered_block, match_transaction, BloomFilter, FilterConfig, FilteredBlock,
    MatchResult, StandardScriptClassifier, WatchList,
};
use crate::ports::{BloomFilterApi, ScriptClassifier};

/// Bloom Filter Service implementation
///
/// Implements the `BloomFilterApi` port using an injected classifier.
pub struct BloomFilterService<C: ScriptClassifier> {
    /// Script classifier (driven port)
    classifier: Arc<C>,
    /// Configuration for built filters
    config: FilterConfig,
}

impl BloomFilterService<StandardScriptClassifier> {
    /// Service with the built-in classifier and default configuration
    pub fn standard() -> Self {
        Self::new(Arc::new(StandardScriptClassifier))
    }
}

impl<C: ScriptClassifier> BloomFilterService<C> {
    /// Create a new service with the given classifier
    pub fn new(classifier: Arc<C>) -> Self {
        Self {
            classifier,
            config: FilterConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(classifier: Arc<C>, config: FilterConfig) -> Self {
        Self { classifier, config }
    }

    /// Configuration used for built filters
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Configured tweak, or a fresh random one
    fn tweak(&self) -> u32 {
        self.config.tweak.unwrap_or_else(rand::random)
    }
}

impl<C: ScriptClassifier> BloomFilterApi for BloomFilterService<C> {
    fn build_filter(&self, watch_list: &WatchList) -> BloomFilter {
        let elements = watch_list.element_count();
        let elements_u32 = u32::try_from(elements).unwrap_or(u32::MAX);

        let mut filter = BloomFilter::new(
            elements_u32,
            self.tweak(),
            self.config.false_positive_rate,
            self.config.update,
        );
        watch_list.insert_into(&mut filter);

        debug!(
            elements = elements,
            size_bytes = filter.size_bytes(),
            hash_funcs = filter.hash_funcs(),
            expected_fpr =
                calculate_fpr(filter.size_bits() as u64, elements as u64, filter.hash_funcs()),
            "Built bloom filter"
        );

        filter
    }

    fn match_transaction(&self, filter: &mut BloomFilter, tx: &Transaction) -> MatchResult {
        let result = match_transaction(filter, tx, self.classifier.as_ref());
        if result.matches {
            debug!(
                txid = %tx.compute_txid(),
                matched_field = ?result.matched_field,
                tracked = result.tracked_outpoints.len(),
                "Transaction matched filter"
            );
        }
        result
    }

    fn filter_block(&self, filter: &mut BloomFilter, block: &Block) -> Option<FilteredBlock> {
        let filtered = filtered_block(filter, block, self.classifier.as_ref())?;
        debug!(
            block_hash = %block.block_hash(),
            transactions = block.txdata.len(),
            matched = filtered.matched_count(),
            "Filtered block"
        );
        Some(filtered)
    }
}
