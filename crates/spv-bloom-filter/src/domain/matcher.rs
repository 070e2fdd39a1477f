//! Transaction matching with filter auto-update
//!
//! Walk order:
//! 1. The transaction id
//! 2. Every output's pushed data; a matching output may insert its outpoint
//!    into the filter, depending on the filter's [`BloomUpdate`] flag
//! 3. Only if nothing matched yet: every input's spent outpoint, then its
//!    pushed data
//!
//! Step 2 visits every output even after a match, since each matching output
//! independently needs its future spend tracked.

use bitcoin::{OutPoint, Script, Transaction};

use super::bloom_filter::{BloomFilter, BloomUpdate};
use super::script::{pushed_data, ScriptClassifier, StandardScriptClassifier};

/// Which element of a transaction matched the filter first
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchedField {
    /// The transaction id
    TxId,
    /// Pushed data of the output at this index
    OutputData(usize),
    /// The outpoint spent by the input at this index
    SpentOutPoint(usize),
    /// Pushed data of the input at this index
    InputData(usize),
}

/// Result of matching a transaction against a filter
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Whether the transaction matched
    pub matches: bool,
    /// First element that matched, if any
    pub matched_field: Option<MatchedField>,
    /// Outpoints inserted into the filter by the update policy
    pub tracked_outpoints: Vec<OutPoint>,
}

impl MatchResult {
    fn record(&mut self, field: MatchedField) {
        if !self.matches {
            self.matches = true;
            self.matched_field = Some(field);
        }
    }
}

fn should_track<C: ScriptClassifier + ?Sized>(
    flags: BloomUpdate,
    script_pubkey: &Script,
    classifier: &C,
) -> bool {
    match flags {
        BloomUpdate::None => false,
        BloomUpdate::All => true,
        BloomUpdate::P2PubkeyOnly => classifier.classify(script_pubkey).is_pubkey_template(),
    }
}

/// Match `tx` against `filter`, inserting outpoints as the filter's update
/// flag allows.
///
/// This both reads and writes the filter in one pass: a matching output of
/// `tx` may add its outpoint, so a later transaction spending it matches too.
pub fn match_transaction<C: ScriptClassifier + ?Sized>(
    filter: &mut BloomFilter,
    tx: &Transaction,
    classifier: &C,
) -> MatchResult {
    let txid = tx.compute_txid();
    let mut result = MatchResult::default();

    if filter.matches_hash(&txid) {
        result.record(MatchedField::TxId);
    }

    for (index, output) in tx.output.iter().enumerate() {
        let Some(elements) = pushed_data(&output.script_pubkey) else {
            continue;
        };
        if !elements.iter().any(|data| filter.matches(data)) {
            continue;
        }

        result.record(MatchedField::OutputData(index));
        if should_track(filter.flags(), &output.script_pubkey, classifier) {
            let outpoint = OutPoint::new(txid, index as u32);
            filter.add_outpoint(&outpoint);
            result.tracked_outpoints.push(outpoint);
        }
    }

    if result.matches {
        return result;
    }

    for (index, input) in tx.input.iter().enumerate() {
        if filter.matches_outpoint(&input.previous_output) {
            result.record(MatchedField::SpentOutPoint(index));
            return result;
        }

        let Some(elements) = pushed_data(&input.script_sig) else {
            continue;
        };
        if elements.iter().any(|data| filter.matches(data)) {
            result.record(MatchedField::InputData(index));
            return result;
        }
    }

    result
}

impl BloomFilter {
    /// Whether `tx` is relevant to this filter, updating the filter with
    /// matched outpoints as its flags allow.
    ///
    /// Mutates the filter. Uses [`StandardScriptClassifier`] for the
    /// `P2PubkeyOnly` policy.
    pub fn match_tx_and_update(&mut self, tx: &Transaction) -> bool {
        match_transaction(self, tx, &StandardScriptClassifier).matches
    }

    /// [`BloomFilter::match_tx_and_update`] with a caller-supplied classifier
    pub fn match_tx_and_update_with<C: ScriptClassifier + ?Sized>(
        &mut self,
        tx: &Transaction,
        classifier: &C,
    ) -> bool {
        match_transaction(self, tx, classifier).matches
    }
}
