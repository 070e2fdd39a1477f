//! Per-peer filter message handler
//!
//! Validates incoming filter messages against the node's policy:
//! - Refuse everything when the node does not serve bloom filters
//! - Reject `filterload` over the size or hash function limit
//! - Reject `filteradd` over the element size limit
//! - Reject `filteradd` / `filterclear` without a loaded filter
//!
//! A rejected message leaves the peer's filter untouched.

use std::sync::Arc;

use bitcoin::consensus::deserialize;
use bitcoin::p2p::message_bloom::{FilterAdd, FilterLoad};
use bitcoin::{Block, Transaction};
use tracing::{debug, warn};

use crate::domain::{
    filtered_block, match_transaction, BloomFilter, FilterPolicy, FilteredBlock,
    StandardScriptClassifier,
};
use crate::error::FilterError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};

/// Filter state and message handling for one connected peer
pub struct PeerFilterHandler {
    /// Peer identifier used in logs
    peer_id: u64,
    /// The peer's filter, unloaded until `filterload`
    filter: BloomFilter,
    /// Limits for incoming messages
    policy: FilterPolicy,
    /// Metrics sink
    metrics: Arc<dyn MetricsRecorder>,
}

impl PeerFilterHandler {
    /// Create a handler with no filter loaded and metrics disabled
    pub fn new(peer_id: u64, policy: FilterPolicy) -> Self {
        Self::with_metrics(peer_id, policy, Arc::new(NoOpMetrics))
    }

    /// Create a handler reporting to `metrics`
    pub fn with_metrics(
        peer_id: u64,
        policy: FilterPolicy,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            peer_id,
            filter: BloomFilter::unloaded(),
            policy,
            metrics,
        }
    }

    /// The peer's current filter
    pub fn filter(&self) -> &BloomFilter {
        &self.filter
    }

    /// Active policy
    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    /// Whether the peer has a filter loaded
    pub fn has_filter(&self) -> bool {
        self.filter.is_loaded()
    }

    fn reject(&self, command: &'static str, error: FilterError) -> Result<(), FilterError> {
        self.metrics.record_rejected();
        warn!(
            peer_id = self.peer_id,
            command = command,
            error = %error,
            misbehavior = error.is_misbehavior(),
            "Rejected filter message"
        );
        Err(error)
    }

    fn ensure_enabled(&self) -> Result<(), FilterError> {
        if self.policy.enabled {
            Ok(())
        } else {
            Err(FilterError::BloomServiceDisabled)
        }
    }

    /// Validate a `filterload` against the policy
    pub fn validate_filter_load(&self, msg: &FilterLoad) -> Result<(), FilterError> {
        self.ensure_enabled()?;

        if msg.filter.len() > self.policy.max_filter_size {
            return Err(FilterError::FilterTooLarge {
                size: msg.filter.len(),
                max: self.policy.max_filter_size,
            });
        }

        if msg.hash_funcs > self.policy.max_hash_funcs {
            return Err(FilterError::TooManyHashFuncs {
                count: msg.hash_funcs,
                max: self.policy.max_hash_funcs,
            });
        }

        Ok(())
    }

    /// Validate a `filteradd` against the policy and filter state
    pub fn validate_filter_add(&self, msg: &FilterAdd) -> Result<(), FilterError> {
        self.ensure_enabled()?;

        if msg.data.len() > self.policy.max_filter_add_size {
            return Err(FilterError::FilterAddTooLarge {
                size: msg.data.len(),
                max: self.policy.max_filter_add_size,
            });
        }

        if !self.filter.is_loaded() {
            return Err(FilterError::NoFilterLoaded);
        }

        Ok(())
    }

    /// Handle `filterload`, replacing any loaded filter
    pub fn on_filter_load(&mut self, msg: &FilterLoad) -> Result<(), FilterError> {
        if let Err(e) = self.validate_filter_load(msg) {
            return self.reject("filterload", e);
        }

        self.filter.reload(Some(msg));
        self.metrics
            .record_filter_loaded(self.filter.size_bytes(), self.filter.hash_funcs());
        debug!(
            peer_id = self.peer_id,
            size_bytes = self.filter.size_bytes(),
            hash_funcs = self.filter.hash_funcs(),
            tweak = self.filter.tweak(),
            flags = ?self.filter.flags(),
            "Loaded peer filter"
        );
        Ok(())
    }

    /// Decode a `filterload` payload, then handle it
    pub fn on_filter_load_bytes(&mut self, payload: &[u8]) -> Result<(), FilterError> {
        match deserialize::<FilterLoad>(payload) {
            Ok(msg) => self.on_filter_load(&msg),
            Err(e) => self.reject("filterload", e.into()),
        }
    }

    /// Handle `filteradd`
    pub fn on_filter_add(&mut self, msg: &FilterAdd) -> Result<(), FilterError> {
        if let Err(e) = self.validate_filter_add(msg) {
            return self.reject("filteradd", e);
        }

        self.filter.add(&msg.data);
        self.metrics.record_element_added();
        debug!(
            peer_id = self.peer_id,
            len = msg.data.len(),
            "Added element to peer filter"
        );
        Ok(())
    }

    /// Decode a `filteradd` payload, then handle it
    pub fn on_filter_add_bytes(&mut self, payload: &[u8]) -> Result<(), FilterError> {
        match deserialize::<FilterAdd>(payload) {
            Ok(msg) => self.on_filter_add(&msg),
            Err(e) => self.reject("filteradd", e.into()),
        }
    }

    /// Handle `filterclear`
    pub fn on_filter_clear(&mut self) -> Result<(), FilterError> {
        if let Err(e) = self.ensure_enabled() {
            return self.reject("filterclear", e);
        }
        if !self.filter.is_loaded() {
            return self.reject("filterclear", FilterError::NoFilterLoaded);
        }

        self.filter.unload();
        self.metrics.record_filter_cleared();
        debug!(peer_id = self.peer_id, "Cleared peer filter");
        Ok(())
    }

    /// Whether `tx` should be announced to the peer
    ///
    /// Without a filter every transaction is relayed. With one, matching
    /// also applies the filter's update policy.
    pub fn should_relay(&mut self, tx: &Transaction) -> bool {
        if !self.filter.is_loaded() {
            return true;
        }

        let result = match_transaction(&mut self.filter, tx, &StandardScriptClassifier);
        self.metrics
            .record_transaction(result.matches, result.tracked_outpoints.len());
        if result.matches {
            debug!(
                peer_id = self.peer_id,
                txid = %tx.compute_txid(),
                matched_field = ?result.matched_field,
                "Relaying matched transaction"
            );
        }
        result.matches
    }

    /// Build the `merkleblock` for `block`, `None` without a loaded filter
    pub fn filter_block(&mut self, block: &Block) -> Option<FilteredBlock> {
        if !self.filter.is_loaded() {
            return None;
        }

        let filtered = filtered_block(&mut self.filter, block, &StandardScriptClassifier)?;
        self.metrics.record_block_filtered(filtered.matched_count());
        debug!(
            peer_id = self.peer_id,
            block_hash = %block.block_hash(),
            matched = filtered.matched_count(),
            "Filtered block for peer"
        );
        Some(filtered)
    }
}

impl Default for PeerFilterHandler {
    fn default() -> Self {
        Self::new(0, FilterPolicy::default())
    }
}
