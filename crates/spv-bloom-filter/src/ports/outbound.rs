//! Outbound Ports (Driven Ports)
//!
//! The matcher needs to know whether an output script is a bare public key
//! or bare multisig template. Hosts with their own script engine implement
//! [`ScriptClassifier`]; the crate ships
//! [`StandardScriptClassifier`](crate::domain::StandardScriptClassifier).

pub use crate::domain::script::{ScriptClass, ScriptClassifier};
