//! # SPV Bloom Filter
//!
//! BIP37 connection bloom filters for light clients and the nodes serving
//! them.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure filter logic, no I/O
//!   - `BloomFilter`: The filter, its lifecycle and wire form
//!   - `match_transaction`: Transaction matching with outpoint auto-update
//!   - `filtered_block`: `merkleblock` construction
//!   - `FilterConfig` / `FilterPolicy`: Configuration with validation
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `BloomFilterApi`: Driving port (inbound API)
//!   - `ScriptClassifier`: Driven port (script template knowledge)
//!
//! - **Service Layer** (`service/`): Wallet-side orchestration
//!   - `BloomFilterService`: Implements `BloomFilterApi`
//!
//! - **Handler Layer** (`handler/`): Node-side message handling
//!   - `PeerFilterHandler`: Validates and applies `filterload`,
//!     `filteradd` and `filterclear` for one peer
//!
//! ## Invariants
//!
//! - **INVARIANT-1**: A constructed filter never exceeds 36,000 bytes or 50
//!   hash functions
//! - **INVARIANT-2**: No false negatives - if inserted, `matches()` MUST return true
//! - **INVARIANT-3**: Bit positions are MurmurHash3 with seed
//!   `i * 0xFBA4C795 + tweak`, so peers agree on the encoding
//!
//! ## Usage Example
//!
//! ```ignore
//! use spv_bloom_filter::{BloomFilter, BloomUpdate};
//!
//! let mut filter = BloomFilter::new(10, 0, 0.000001, BloomUpdate::All);
//! filter.add(&pubkey_hash);
//!
//! if filter.match_tx_and_update(&tx) {
//!     // relevant, and its matching outputs are now tracked
//! }
//! let payload = filter.serialize();
//! ```

pub mod domain;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    BloomFilter, BloomUpdate, FilterConfig, FilterConfigBuilder, FilterPolicy, FilteredBlock,
    MatchResult, MatchedField, StandardScriptClassifier, WatchList,
};
pub use error::FilterError;
pub use handler::PeerFilterHandler;
pub use metrics::{FilterMetrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{BloomFilterApi, ScriptClass, ScriptClassifier};
pub use service::BloomFilterService;
