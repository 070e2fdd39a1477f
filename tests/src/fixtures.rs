//! Shared test fixtures

use std::sync::Once;

use bitcoin::block::{Header, Version as BlockVersion};
use bitcoin::consensus::deserialize;
use bitcoin::hashes::Hash;
use bitcoin::{Block, BlockHash, CompactTarget, Transaction, TxMerkleNode};

/// Mainnet transaction b4749f017444b051c44dfd2720e88f314ff94f3dd6d56d40ef65854fcd7fff6b
pub const REFERENCE_TX_HEX: &str = concat!(
    "01000000010b26e9b7735eb6aabdf358bab62f9816a21ba9ebdb719d5299e",
    "88607d722c190000000008b4830450220070aca44506c5cef3a16ed519d7",
    "c3c39f8aab192c4e1c90d065f37b8a4af6141022100a8e160b856c2d43d2",
    "7d8fba71e5aef6405b8643ac4cb7cb3c462aced7f14711a0141046d11fee",
    "51b0e60666d5049a9101a72741df480b96ee26488a4d3466b95c9a40ac5e",
    "eef87e10a5cd336c19a84565f80fa6c547957b7700ff4dfbdefe76036c33",
    "9ffffffff021bff3d11000000001976a91404943fdd508053c75000106d3",
    "bc6e2754dbcff1988ac2f15de00000000001976a914a266436d296554760",
    "8b9e15d9032a7b9d64fa43188ac00000000",
);

/// Transaction spending output 0 of the reference transaction
pub const SPENDING_TX_HEX: &str = concat!(
    "01000000016bff7fcd4f8565ef406dd5d63d4ff94f318fe82027fd4dc451b0",
    "4474019f74b4000000008c493046022100da0dc6aecefe1e06efdf05773757",
    "deb168820930e3b0d03f46f5fcf150bf990c022100d25b5c87040076e4f253",
    "f8262e763e2dd51e7ff0be157727c4bc42807f17bd39014104e6c26ef67dc6",
    "10d2cd192484789a6cf9aea9930b944b7e2db5342b9d9e5b9ff79aff9a2ee1",
    "978dd7fd01dfc522ee02283d3b06a9d03acf8096968d7dbb0f9178ffffffff",
    "028ba7940e000000001976a914badeecfdef0507247fc8f74241d73bc03997",
    "2d7b88ac4094a802000000001976a914c10932483fec93ed51f5fe95e72559",
    "f2cc7043f988ac00000000",
);

/// Display-order id of the reference transaction
pub const REFERENCE_TXID: &str =
    "b4749f017444b051c44dfd2720e88f314ff94f3dd6d56d40ef65854fcd7fff6b";

static TRACING: Once = Once::new();

/// Install a test subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Decode a consensus-encoded transaction from hex
pub fn tx_from_hex(tx_hex: &str) -> Transaction {
    let bytes = hex::decode(tx_hex).expect("fixture hex");
    deserialize(&bytes).expect("fixture transaction")
}

/// The reference transaction
pub fn reference_tx() -> Transaction {
    tx_from_hex(REFERENCE_TX_HEX)
}

/// The transaction spending the reference transaction's first output
pub fn spending_tx() -> Transaction {
    tx_from_hex(SPENDING_TX_HEX)
}

/// Block holding `txdata` with a correct merkle root
pub fn block_with(txdata: Vec<Transaction>) -> Block {
    let mut block = Block {
        header: Header {
            version: BlockVersion::ONE,
            prev_blockhash: BlockHash::all_zeros(),
            merkle_root: TxMerkleNode::all_zeros(),
            time: 1_293_623_863,
            bits: CompactTarget::from_consensus(0x1b04_864c),
            nonce: 0x0f1d_2a30,
        },
        txdata,
    };
    if let Some(root) = block.compute_merkle_root() {
        block.header.merkle_root = root;
    }
    block
}
