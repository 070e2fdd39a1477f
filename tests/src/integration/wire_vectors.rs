//! # Wire Vectors
//!
//! Serialized `filterload` payloads that peers running other
//! implementations produce for the same inputs.

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bitcoin::consensus::{deserialize, serialize};
    use bitcoin::p2p::message_bloom::{BloomFlags, FilterLoad};
    use bitcoin::secp256k1::Secp256k1;
    use bitcoin::{PrivateKey, PublicKey, Txid};

    use spv_bloom_filter::domain::MAX_FILTER_LOAD_FILTER_SIZE;
    use spv_bloom_filter::{BloomFilter, BloomUpdate};

    const FP_RANGE_HASH: &str = "02981fa052f0481dbc5868f4fc2166035a10f27a03cfd2de67326471df5bc041";

    fn serialized_after_hash(filter: &mut BloomFilter) -> String {
        filter.add_hash(&Txid::from_str(FP_RANGE_HASH).unwrap());
        hex::encode(filter.serialize().unwrap())
    }

    #[test]
    fn test_rate_above_one_is_clamped() {
        let mut filter = BloomFilter::new(1, 0, 20.9999999769, BloomUpdate::All);
        assert_eq!(serialized_after_hash(&mut filter), "00000000000000000001");
    }

    #[test]
    fn test_zero_rate_is_clamped_to_minimum() {
        let mut filter = BloomFilter::new(1, 0, 0.0, BloomUpdate::All);
        assert_eq!(
            serialized_after_hash(&mut filter),
            "0566d97a91a91b0000000000000001"
        );
    }

    #[test]
    fn test_negative_rate_is_clamped_to_minimum() {
        let mut filter = BloomFilter::new(1, 0, -1.0, BloomUpdate::All);
        assert_eq!(
            serialized_after_hash(&mut filter),
            "0566d97a91a91b0000000000000001"
        );
    }

    #[test]
    fn test_large_filter_is_capped() {
        let filter = BloomFilter::new(100_000_000, 0, 0.01, BloomUpdate::None);
        let msg = filter.msg_filter_load().unwrap();
        assert_eq!(msg.filter.len(), MAX_FILTER_LOAD_FILTER_SIZE as usize);
    }

    #[test]
    fn test_insert_key_and_hash() {
        let secp = Secp256k1::new();
        let private_key =
            PrivateKey::from_wif("5Kg1gnAjaLfKiwhhPpGS3QfRg2m6awQvaj98JCZBZQ5SuS2F15C").unwrap();
        let public_key = PublicKey::from_private_key(&secp, &private_key);
        assert!(!public_key.compressed);

        let mut filter = BloomFilter::new(2, 0, 0.001, BloomUpdate::All);
        filter.add(&public_key.to_bytes());
        filter.add(public_key.pubkey_hash().as_ref());

        assert_eq!(
            hex::encode(filter.serialize().unwrap()),
            "038fc16b080000000000000001"
        );
    }

    #[test]
    fn test_decoded_payload_loads_identically() {
        let bytes = hex::decode("03614e9b050000000000000001").unwrap();
        let msg: FilterLoad = deserialize(&bytes).unwrap();
        assert_eq!(msg.filter, vec![0x61, 0x4e, 0x9b]);
        assert_eq!(msg.hash_funcs, 5);
        assert_eq!(msg.tweak, 0);
        assert_eq!(msg.flags, BloomFlags::All);

        let filter = BloomFilter::load(&msg);
        assert!(filter.matches(&hex::decode("99108ad8ed9bb6274d3980bab5a85c048f0950c8").unwrap()));
        assert_eq!(serialize(&filter.msg_filter_load().unwrap()), bytes);
    }

    #[test]
    fn test_empty_payload_loads_and_unloads() {
        let msg = FilterLoad {
            filter: vec![],
            hash_funcs: 0,
            tweak: 0,
            flags: BloomFlags::None,
        };
        let mut filter = BloomFilter::load(&msg);
        assert!(filter.is_loaded());
        filter.unload();
        assert!(!filter.is_loaded());
    }

    #[test]
    fn test_reload_none_drops_payload() {
        let filter = BloomFilter::new(10, 0, 0.000001, BloomUpdate::All);
        let mut loaded = BloomFilter::load(&filter.msg_filter_load().unwrap());
        assert!(loaded.msg_filter_load().is_some());

        loaded.reload(None);
        assert!(loaded.msg_filter_load().is_none());
    }
}
