//! Ports Layer
//!
//! - Driving port (inbound): [`BloomFilterApi`]
//! - Driven port (outbound): [`ScriptClassifier`], the script template
//!   knowledge the update policy depends on

pub mod inbound;
pub mod outbound;

pub use inbound::BloomFilterApi;
pub use outbound::{ScriptClass, ScriptClassifier};
