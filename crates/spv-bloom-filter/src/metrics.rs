//! Metrics hooks for filter handling
//!
//! Counters for filter lifecycle, matching and rejected payloads.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use spv_bloom_filter::{FilterMetrics, FilterPolicy, PeerFilterHandler};
//!
//! let metrics = Arc::new(FilterMetrics::new());
//! let handler =
//!     PeerFilterHandler::with_metrics(peer_id, FilterPolicy::default(), metrics.clone());
//! // ...
//! println!("{:?}", metrics.snapshot());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for filter operations
///
/// Thread-safe counters; one collector may be shared across peers.
#[derive(Debug, Default)]
pub struct FilterMetrics {
    /// Filters loaded from `filterload`
    pub filters_loaded: AtomicU64,
    /// Filters cleared by `filterclear`
    pub filters_cleared: AtomicU64,
    /// Elements added by `filteradd`
    pub elements_added: AtomicU64,
    /// Transactions tested against a loaded filter
    pub transactions_checked: AtomicU64,
    /// Transactions that matched
    pub transactions_matched: AtomicU64,
    /// Outpoints inserted by the update policy
    pub outpoints_tracked: AtomicU64,
    /// Blocks reduced to `merkleblock`
    pub blocks_filtered: AtomicU64,
    /// Filter messages refused
    pub payloads_rejected: AtomicU64,
}

impl FilterMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            filters_loaded: self.filters_loaded.load(Ordering::Relaxed),
            filters_cleared: self.filters_cleared.load(Ordering::Relaxed),
            elements_added: self.elements_added.load(Ordering::Relaxed),
            transactions_checked: self.transactions_checked.load(Ordering::Relaxed),
            transactions_matched: self.transactions_matched.load(Ordering::Relaxed),
            outpoints_tracked: self.outpoints_tracked.load(Ordering::Relaxed),
            blocks_filtered: self.blocks_filtered.load(Ordering::Relaxed),
            payloads_rejected: self.payloads_rejected.load(Ordering::Relaxed),
        }
    }

    /// Share of checked transactions that matched
    ///
    /// Includes false positives, so it bounds the filter's real rate from above.
    pub fn observed_match_rate(&self) -> f64 {
        let checked = self.transactions_checked.load(Ordering::Relaxed);
        let matched = self.transactions_matched.load(Ordering::Relaxed);
        if checked > 0 {
            matched as f64 / checked as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.filters_loaded.store(0, Ordering::Relaxed);
        self.filters_cleared.store(0, Ordering::Relaxed);
        self.elements_added.store(0, Ordering::Relaxed);
        self.transactions_checked.store(0, Ordering::Relaxed);
        self.transactions_matched.store(0, Ordering::Relaxed);
        self.outpoints_tracked.store(0, Ordering::Relaxed);
        self.blocks_filtered.store(0, Ordering::Relaxed);
        self.payloads_rejected.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub filters_loaded: u64,
    pub filters_cleared: u64,
    pub elements_added: u64,
    pub transactions_checked: u64,
    pub transactions_matched: u64,
    pub outpoints_tracked: u64,
    pub blocks_filtered: u64,
    pub payloads_rejected: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to forward counts to an external metrics system.
pub trait MetricsRecorder: Send + Sync {
    /// Record a `filterload`
    fn record_filter_loaded(&self, size_bytes: usize, hash_funcs: u32);

    /// Record a `filterclear`
    fn record_filter_cleared(&self);

    /// Record a `filteradd`
    fn record_element_added(&self);

    /// Record a transaction match attempt
    fn record_transaction(&self, matched: bool, outpoints_tracked: usize);

    /// Record a filtered block
    fn record_block_filtered(&self, matched: usize);

    /// Record a refused filter message
    fn record_rejected(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Debug, Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_filter_loaded(&self, _: usize, _: u32) {}
    fn record_filter_cleared(&self) {}
    fn record_element_added(&self) {}
    fn record_transaction(&self, _: bool, _: usize) {}
    fn record_block_filtered(&self, _: usize) {}
    fn record_rejected(&self) {}
}

impl MetricsRecorder for FilterMetrics {
    fn record_filter_loaded(&self, _size_bytes: usize, _hash_funcs: u32) {
        self.filters_loaded.fetch_add(1, Ordering::Relaxed);
    }

    fn record_filter_cleared(&self) {
        self.filters_cleared.fetch_add(1, Ordering::Relaxed);
    }

    fn record_element_added(&self) {
        self.elements_added.fetch_add(1, Ordering::Relaxed);
    }

    fn record_transaction(&self, matched: bool, outpoints_tracked: usize) {
        self.transactions_checked.fetch_add(1, Ordering::Relaxed);
        if matched {
            self.transactions_matched.fetch_add(1, Ordering::Relaxed);
        }
        self.outpoints_tracked
            .fetch_add(outpoints_tracked as u64, Ordering::Relaxed);
    }

    fn record_block_filtered(&self, _matched: usize) {
        self.blocks_filtered.fetch_add(1, Ordering::Relaxed);
    }

    fn record_rejected(&self) {
        self.payloads_rejected.fetch_add(1, Ordering::Relaxed);
    }
}
