//! Handler Layer
//!
//! Validates and applies the filter messages a peer sends.

pub mod peer_handler;

pub use peer_handler::PeerFilterHandler;
