//! Script analysis used by the transaction matcher
//!
//! The matcher only needs two things from a script: the data elements it
//! pushes, and whether an output script is a bare public key or bare
//! multisig template. The latter is behind [`ScriptClassifier`] so hosts with
//! their own script engine can supply it.

use bitcoin::opcodes::all::{
    OP_CHECKMULTISIG, OP_CHECKSIG, OP_PUSHBYTES_0, OP_PUSHBYTES_33, OP_PUSHBYTES_65, OP_PUSHNUM_1,
    OP_PUSHNUM_16,
};
use bitcoin::script::{Instruction, Script};

/// Standard output templates relevant to the update policy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptClass {
    /// `<pubkey> OP_CHECKSIG`
    PayToPubKey,
    /// `OP_m <pubkey>... OP_n OP_CHECKMULTISIG`
    PayToMultisig,
    /// Anything else, including unparseable scripts
    Other,
}

impl ScriptClass {
    /// Whether the encumbrance is itself a public key
    pub fn is_pubkey_template(self) -> bool {
        matches!(self, ScriptClass::PayToPubKey | ScriptClass::PayToMultisig)
    }
}

/// Classifies locking scripts (driven port)
pub trait ScriptClassifier: Send + Sync {
    /// Classify an output script
    fn classify(&self, script: &Script) -> ScriptClass;
}

/// Template matcher for the standard P2PK and bare multisig shapes
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardScriptClassifier;

impl ScriptClassifier for StandardScriptClassifier {
    fn classify(&self, script: &Script) -> ScriptClass {
        let bytes = script.as_bytes();
        if is_pay_to_pubkey(bytes) {
            ScriptClass::PayToPubKey
        } else if is_multisig(bytes) {
            ScriptClass::PayToMultisig
        } else {
            ScriptClass::Other
        }
    }
}

/// Every data element pushed by `script`, in order
///
/// `OP_0` yields an empty element; `OP_1`..`OP_16` are opcodes, not data.
/// Returns `None` when the script does not parse (e.g. a truncated push),
/// in which case none of its elements take part in matching.
pub fn pushed_data(script: &Script) -> Option<Vec<&[u8]>> {
    script
        .instructions()
        .filter_map(|instruction| match instruction {
            Ok(Instruction::PushBytes(bytes)) => Some(Ok(bytes.as_bytes())),
            Ok(Instruction::Op(_)) => None,
            Err(e) => Some(Err(e)),
        })
        .collect::<Result<Vec<_>, _>>()
        .ok()
}

/// Compressed keys are 33 bytes (02/03), uncompressed and hybrid 65 (04/06/07)
fn is_valid_size_pubkey(data: &[u8]) -> bool {
    match (data.len(), data.first()) {
        (33, Some(0x02 | 0x03)) => true,
        (65, Some(0x04 | 0x06 | 0x07)) => true,
        _ => false,
    }
}

/// Key length for the exact `OP_PUSHBYTES_33` / `OP_PUSHBYTES_65` opcodes
fn pubkey_push_len(opcode: u8) -> Option<usize> {
    if opcode == OP_PUSHBYTES_33.to_u8() {
        Some(33)
    } else if opcode == OP_PUSHBYTES_65.to_u8() {
        Some(65)
    } else {
        None
    }
}

/// `OP_0` and `OP_1`..`OP_16` as numbers
fn small_int(opcode: u8) -> Option<u8> {
    if opcode == OP_PUSHBYTES_0.to_u8() {
        Some(0)
    } else if (OP_PUSHNUM_1.to_u8()..=OP_PUSHNUM_16.to_u8()).contains(&opcode) {
        Some(opcode - OP_PUSHNUM_1.to_u8() + 1)
    } else {
        None
    }
}

/// Splits a canonical key push off the front of `bytes`
fn take_pubkey(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let (&opcode, rest) = bytes.split_first()?;
    let len = pubkey_push_len(opcode)?;
    if rest.len() < len {
        return None;
    }
    let (key, rest) = rest.split_at(len);
    is_valid_size_pubkey(key).then_some((key, rest))
}

fn is_pay_to_pubkey(bytes: &[u8]) -> bool {
    match take_pubkey(bytes) {
        Some((_, rest)) => rest == [OP_CHECKSIG.to_u8()],
        None => false,
    }
}

fn is_multisig(bytes: &[u8]) -> bool {
    let [first, body @ .., total, last] = bytes else {
        return false;
    };
    if *last != OP_CHECKMULTISIG.to_u8() {
        return false;
    }
    let (Some(required), Some(total)) = (small_int(*first), small_int(*total)) else {
        return false;
    };
    if required > total {
        return false;
    }

    let mut keys = 0usize;
    let mut rest = body;
    while !rest.is_empty() {
        match take_pubkey(rest) {
            Some((_, remaining)) => {
                keys += 1;
                rest = remaining;
            }
            None => return false,
        }
    }
    keys == usize::from(total)
}
