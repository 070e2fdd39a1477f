//! # Transaction Matching
//!
//! Matching and outpoint auto-update against real mainnet transactions.
//!
//! ## Flow Tested:
//!
//! 1. Each element of the reference transaction matches on its own
//! 2. A matched output is tracked, so its spend matches next
//! 3. Unrelated hashes, addresses and outpoints do not match

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bitcoin::{OutPoint, Txid};

    use spv_bloom_filter::domain::match_transaction;
    use spv_bloom_filter::{
        BloomFilter, BloomUpdate, MatchedField, StandardScriptClassifier,
    };

    use crate::fixtures::{init_tracing, reference_tx, spending_tx, REFERENCE_TXID};

    const SPENT_TXID: &str = "90c122d70786e899529d71dbeba91ba216982fb6ba58f3bdaab65e73b7e9260b";

    fn fresh_filter() -> BloomFilter {
        BloomFilter::new(10, 0, 0.000001, BloomUpdate::All)
    }

    fn filter_with(data_hex: &str) -> BloomFilter {
        let mut filter = fresh_filter();
        filter.add(&hex::decode(data_hex).unwrap());
        filter
    }

    #[test]
    fn test_fixture_txid() {
        assert_eq!(reference_tx().compute_txid().to_string(), REFERENCE_TXID);
        assert_eq!(
            spending_tx().input[0].previous_output,
            OutPoint::new(Txid::from_str(REFERENCE_TXID).unwrap(), 0)
        );
    }

    #[test]
    fn test_matches_txid() {
        init_tracing();
        let mut filter = fresh_filter();
        filter.add_hash(&Txid::from_str(REFERENCE_TXID).unwrap());
        assert!(filter.match_tx_and_update(&reference_tx()));
    }

    #[test]
    fn test_matches_raw_txid_bytes() {
        let mut filter =
            filter_with("6bff7fcd4f8565ef406dd5d63d4ff94f318fe82027fd4dc451b04474019f74b4");
        assert!(filter.match_tx_and_update(&reference_tx()));
    }

    #[test]
    fn test_matches_input_signature() {
        let mut filter = filter_with(concat!(
            "30450220070aca44506c5cef3a16ed519d7c3c39f8aab192c4e1c90d065",
            "f37b8a4af6141022100a8e160b856c2d43d27d8fba71e5aef6405b8643",
            "ac4cb7cb3c462aced7f14711a01",
        ));
        let result = match_transaction(&mut filter, &reference_tx(), &StandardScriptClassifier);
        assert!(result.matches);
        assert_eq!(result.matched_field, Some(MatchedField::InputData(0)));
    }

    #[test]
    fn test_matches_input_pubkey() {
        let mut filter = filter_with(concat!(
            "046d11fee51b0e60666d5049a9101a72741df480b96ee26488a4d3466b95",
            "c9a40ac5eeef87e10a5cd336c19a84565f80fa6c547957b7700ff4dfbdefe",
            "76036c339",
        ));
        assert!(filter.match_tx_and_update(&reference_tx()));
    }

    #[test]
    fn test_output_match_tracks_spend() {
        init_tracing();
        let mut filter = filter_with("04943fdd508053c75000106d3bc6e2754dbcff19");

        let result = match_transaction(&mut filter, &reference_tx(), &StandardScriptClassifier);
        assert!(result.matches);
        assert_eq!(result.matched_field, Some(MatchedField::OutputData(0)));
        assert_eq!(
            result.tracked_outpoints,
            vec![OutPoint::new(Txid::from_str(REFERENCE_TXID).unwrap(), 0)]
        );

        // nothing in the spend itself was inserted; the tracked outpoint matches
        let result = match_transaction(&mut filter, &spending_tx(), &StandardScriptClassifier);
        assert!(result.matches);
        assert_eq!(result.matched_field, Some(MatchedField::SpentOutPoint(0)));
    }

    #[test]
    fn test_matches_second_output() {
        let mut filter = filter_with("a266436d2965547608b9e15d9032a7b9d64fa431");
        let result = match_transaction(&mut filter, &reference_tx(), &StandardScriptClassifier);
        assert_eq!(result.matched_field, Some(MatchedField::OutputData(1)));
    }

    #[test]
    fn test_matches_spent_outpoint() {
        let mut filter = fresh_filter();
        filter.add_outpoint(&OutPoint::new(Txid::from_str(SPENT_TXID).unwrap(), 0));
        let result = match_transaction(&mut filter, &reference_tx(), &StandardScriptClassifier);
        assert_eq!(result.matched_field, Some(MatchedField::SpentOutPoint(0)));
    }

    #[test]
    fn test_unrelated_hash_does_not_match() {
        let mut filter = fresh_filter();
        filter.add_hash(
            &Txid::from_str("00000009e784f32f62ef849763d4f45b98e07ba658647343b915ff832b110436")
                .unwrap(),
        );
        assert!(!filter.match_tx_and_update(&reference_tx()));
    }

    #[test]
    fn test_unrelated_address_does_not_match() {
        let mut filter = filter_with("0000006d2965547608b9e15d9032a7b9d64fa431");
        assert!(!filter.match_tx_and_update(&reference_tx()));
    }

    #[test]
    fn test_wrong_output_index_does_not_match() {
        let mut filter = fresh_filter();
        filter.add_outpoint(&OutPoint::new(Txid::from_str(SPENT_TXID).unwrap(), 1));
        assert!(!filter.match_tx_and_update(&reference_tx()));
    }

    #[test]
    fn test_wrong_outpoint_txid_does_not_match() {
        let mut filter = fresh_filter();
        filter.add_outpoint(&OutPoint::new(
            Txid::from_str("000000d70786e899529d71dbeba91ba216982fb6ba58f3bdaab65e73b7e9260b")
                .unwrap(),
            0,
        ));
        assert!(!filter.match_tx_and_update(&reference_tx()));
    }

    #[test]
    fn test_update_none_does_not_track_outpoints() {
        let mut filter = BloomFilter::new(10, 0, 0.000001, BloomUpdate::None);
        filter.add(
            &hex::decode(concat!(
                "04eaafc2314def4ca98ac970241bcab022b9c1e1f4ea423a20f134c",
                "876f2c01ec0f0dd5b2e86e7168cefe0d81113c3807420ce13ad1357231a",
                "2252247d97a46a91",
            ))
            .unwrap(),
        );
        filter.add(&hex::decode("b6efd80d99179f4f4ff6f4dd0a007d018c385d21").unwrap());

        for txid in [
            "147caa76786596590baa4e98f5d9f48b86c7765e489f7a6ff3360fe5c674360b",
            "02981fa052f0481dbc5868f4fc2166035a10f27a03cfd2de67326471df5bc041",
        ] {
            let outpoint = OutPoint::new(Txid::from_str(txid).unwrap(), 0);
            assert!(!filter.matches_outpoint(&outpoint), "matched outpoint {}", txid);
        }
    }

    #[test]
    fn test_update_none_misses_spend() {
        let mut filter = BloomFilter::new(10, 0, 0.000001, BloomUpdate::None);
        filter.add(&hex::decode("04943fdd508053c75000106d3bc6e2754dbcff19").unwrap());

        assert!(filter.match_tx_and_update(&reference_tx()));
        assert!(!filter.match_tx_and_update(&spending_tx()));
    }

    #[test]
    fn test_p2pubkey_only_skips_p2pkh_outputs() {
        let mut filter = BloomFilter::new(10, 0, 0.000001, BloomUpdate::P2PubkeyOnly);
        filter.add(&hex::decode("04943fdd508053c75000106d3bc6e2754dbcff19").unwrap());

        let result = match_transaction(&mut filter, &reference_tx(), &StandardScriptClassifier);
        assert!(result.matches);
        assert!(result.tracked_outpoints.is_empty());
        assert!(!filter.match_tx_and_update(&spending_tx()));
    }
}
