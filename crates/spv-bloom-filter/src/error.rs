//! Error types for the filter protocol boundary
//!
//! Filter construction and matching never fail; these errors come from
//! validating what peers send and from policy configuration.

use thiserror::Error;

/// Errors raised while handling filter messages or loading policy
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Filter size exceeds maximum: {size} > {max}")]
    FilterTooLarge { size: usize, max: usize },

    #[error("Too many hash functions: {count} > {max}")]
    TooManyHashFuncs { count: u32, max: u32 },

    #[error("filteradd element exceeds maximum: {size} > {max}")]
    FilterAddTooLarge { size: usize, max: usize },

    #[error("No filter loaded")]
    NoFilterLoaded,

    #[error("Bloom filter service is disabled")]
    BloomServiceDisabled,

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),
}

impl From<bitcoin::consensus::encode::Error> for FilterError {
    fn from(e: bitcoin::consensus::encode::Error) -> Self {
        FilterError::Decode(e.to_string())
    }
}

impl FilterError {
    /// Whether a peer sending this should be treated as misbehaving
    ///
    /// A disabled service is a local decision, everything else is a
    /// malformed or out-of-protocol message.
    pub fn is_misbehavior(&self) -> bool {
        !matches!(
            self,
            FilterError::BloomServiceDisabled | FilterError::InvalidParameters(_)
        )
    }
}
