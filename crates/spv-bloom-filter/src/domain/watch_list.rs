//! Wallet elements a light client wants its peers to watch

use bitcoin::hashes::Hash;
use bitcoin::{OutPoint, PublicKey, Script, ScriptBuf};

use super::bloom_filter::BloomFilter;
use super::script::pushed_data;

/// Everything a wallet inserts into its filter
///
/// Public keys are inserted together with their HASH160 so that both
/// pay-to-pubkey and pay-to-pubkey-hash outputs match. Scripts contribute
/// each data element they push.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WatchList {
    data: Vec<Vec<u8>>,
    pubkeys: Vec<PublicKey>,
    scripts: Vec<ScriptBuf>,
    outpoints: Vec<OutPoint>,
}

impl WatchList {
    /// Create an empty watch list
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch a raw data element
    pub fn with_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data.push(data.into());
        self
    }

    /// Watch a public key and its hash
    pub fn with_pubkey(mut self, pubkey: PublicKey) -> Self {
        self.pubkeys.push(pubkey);
        self
    }

    /// Watch the pushes of a script, typically an output script we own
    pub fn with_script(mut self, script: &Script) -> Self {
        self.scripts.push(script.to_owned());
        self
    }

    /// Watch for spends of an outpoint
    pub fn with_outpoint(mut self, outpoint: OutPoint) -> Self {
        self.outpoints.push(outpoint);
        self
    }

    /// Number of filter elements this list inserts
    pub fn element_count(&self) -> usize {
        let script_elements: usize = self
            .scripts
            .iter()
            .filter_map(|script| pushed_data(script))
            .map(|elements| elements.len())
            .sum();
        self.data.len() + self.pubkeys.len() * 2 + script_elements + self.outpoints.len()
    }

    /// Whether the list inserts nothing
    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }

    /// Insert every element into `filter`
    pub fn insert_into(&self, filter: &mut BloomFilter) {
        for data in &self.data {
            filter.add(data);
        }
        for pubkey in &self.pubkeys {
            filter.add(&pubkey.to_bytes());
            filter.add(pubkey.pubkey_hash().as_byte_array());
        }
        for script in &self.scripts {
            // scripts that do not parse contribute nothing
            for element in pushed_data(script).unwrap_or_default() {
                filter.add(element);
            }
        }
        for outpoint in &self.outpoints {
            filter.add_outpoint(outpoint);
        }
    }
}
