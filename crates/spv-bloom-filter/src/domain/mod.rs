//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - Parameter calculations
//! - Hash functions
//! - The BIP37 bloom filter
//! - Script analysis and transaction matching
//! - Filtered blocks
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - No logging

pub mod bloom_filter;
pub mod config;
pub mod hash_functions;
pub mod matcher;
pub mod merkle_block;
pub mod parameters;
pub mod script;
pub mod watch_list;

pub use bloom_filter::{outpoint_bytes, BloomFilter, BloomUpdate, OUTPOINT_SERIALIZED_SIZE};
pub use config::{FilterConfig, FilterConfigBuilder, FilterPolicy};
pub use matcher::{match_transaction, MatchResult, MatchedField};
pub use merkle_block::{filtered_block, FilteredBlock};
pub use parameters::{
    calculate_filter_params, calculate_fpr, clamp_false_positive_rate, FilterParams,
    MAX_FALSE_POSITIVE_RATE, MAX_FILTER_ADD_DATA_SIZE, MAX_FILTER_LOAD_FILTER_SIZE,
    MAX_FILTER_LOAD_HASH_FUNCS, MIN_FALSE_POSITIVE_RATE,
};
pub use script::{pushed_data, ScriptClass, ScriptClassifier, StandardScriptClassifier};
pub use watch_list::WatchList;
