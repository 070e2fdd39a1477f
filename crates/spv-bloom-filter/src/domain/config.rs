//! Filter configuration and peer policy
//!
//! Two halves:
//! - [`FilterConfig`]: how a wallet builds its own filter
//! - [`FilterPolicy`]: what a serving node accepts from its peers
//!
//! # Example
//!
//! ```ignore
//! use spv_bloom_filter::domain::{BloomUpdate, FilterConfigBuilder};
//!
//! let config = FilterConfigBuilder::new()
//!     .false_positive_rate(0.0005)
//!     .update(BloomUpdate::P2PubkeyOnly)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use super::bloom_filter::BloomUpdate;
use super::parameters::{
    MAX_FILTER_ADD_DATA_SIZE, MAX_FILTER_LOAD_FILTER_SIZE, MAX_FILTER_LOAD_HASH_FUNCS,
};
use crate::error::FilterError;

/// Wallet-side filter configuration
///
/// The rate is not range checked: out-of-range values are clamped when the
/// filter is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Target false positive rate
    pub false_positive_rate: f64,
    /// Fixed tweak, or `None` to draw a random one per filter
    pub tweak: Option<u32>,
    /// Outpoint auto-update policy
    pub update: BloomUpdate,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            false_positive_rate: 0.0001,
            tweak: None,
            update: BloomUpdate::All,
        }
    }
}

impl FilterConfig {
    /// Builder-style method to set the false positive rate
    pub fn with_false_positive_rate(mut self, rate: f64) -> Self {
        self.false_positive_rate = rate;
        self
    }

    /// Builder-style method to pin the tweak
    pub fn with_tweak(mut self, tweak: u32) -> Self {
        self.tweak = Some(tweak);
        self
    }

    /// Builder-style method to set the update policy
    pub fn with_update(mut self, update: BloomUpdate) -> Self {
        self.update = update;
        self
    }
}

/// Builder for [`FilterConfig`]
#[derive(Default)]
pub struct FilterConfigBuilder {
    false_positive_rate: Option<f64>,
    tweak: Option<u32>,
    update: Option<BloomUpdate>,
}

impl FilterConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target false positive rate
    pub fn false_positive_rate(mut self, rate: f64) -> Self {
        self.false_positive_rate = Some(rate);
        self
    }

    /// Pin the tweak instead of drawing one at random
    pub fn tweak(mut self, tweak: u32) -> Self {
        self.tweak = Some(tweak);
        self
    }

    /// Set the outpoint auto-update policy
    pub fn update(mut self, update: BloomUpdate) -> Self {
        self.update = Some(update);
        self
    }

    /// Build the configuration
    ///
    /// Only a NaN rate is rejected; every other value is clamped later.
    pub fn build(self) -> Result<FilterConfig, FilterError> {
        let config = self.build_unchecked();
        if config.false_positive_rate.is_nan() {
            return Err(FilterError::InvalidParameters(
                "false_positive_rate must be a number".to_string(),
            ));
        }
        Ok(config)
    }

    /// Build without validation
    pub fn build_unchecked(self) -> FilterConfig {
        let defaults = FilterConfig::default();

        FilterConfig {
            false_positive_rate: self
                .false_positive_rate
                .unwrap_or(defaults.false_positive_rate),
            tweak: self.tweak.or(defaults.tweak),
            update: self.update.unwrap_or(defaults.update),
        }
    }
}

/// What a serving node accepts in `filterload` / `filteradd`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPolicy {
    /// Whether the node serves bloom filters at all
    pub enabled: bool,
    /// Largest accepted bit field, in bytes
    pub max_filter_size: usize,
    /// Largest accepted hash function count
    pub max_hash_funcs: u32,
    /// Largest accepted `filteradd` element, in bytes
    pub max_filter_add_size: usize,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            max_filter_size: MAX_FILTER_LOAD_FILTER_SIZE as usize,
            max_hash_funcs: MAX_FILTER_LOAD_HASH_FUNCS,
            max_filter_add_size: MAX_FILTER_ADD_DATA_SIZE,
        }
    }
}

impl FilterPolicy {
    /// Policy that refuses every filter message
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Limits may be tightened but never loosened past the protocol maxima
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.max_filter_size > MAX_FILTER_LOAD_FILTER_SIZE as usize {
            return Err(FilterError::FilterTooLarge {
                size: self.max_filter_size,
                max: MAX_FILTER_LOAD_FILTER_SIZE as usize,
            });
        }

        if self.max_hash_funcs > MAX_FILTER_LOAD_HASH_FUNCS {
            return Err(FilterError::TooManyHashFuncs {
                count: self.max_hash_funcs,
                max: MAX_FILTER_LOAD_HASH_FUNCS,
            });
        }

        if self.max_filter_add_size > MAX_FILTER_ADD_DATA_SIZE {
            return Err(FilterError::FilterAddTooLarge {
                size: self.max_filter_add_size,
                max: MAX_FILTER_ADD_DATA_SIZE,
            });
        }

        Ok(())
    }

    /// Parse and validate a JSON policy; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, FilterError> {
        let policy: Self = serde_json::from_str(json)
            .map_err(|e| FilterError::InvalidParameters(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }
}
