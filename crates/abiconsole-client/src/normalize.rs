//! Payload normalization
//!
//! Decoded values become JSON. Integers wider than 64 bits are rendered as
//! exact decimal strings, recursively through arrays and tuples.

use crate::provider::TransactionReceipt;
use abiconsole_abi::{render, DynSolValue};
use serde_json::{json, Value};

/// Normalizes a decoded return tuple: nothing becomes `null`, a single value
/// is unwrapped, several values become an array.
pub fn normalize_outputs(values: &[DynSolValue]) -> Value {
    match values {
        [] => Value::Null,
        [single] => normalize(single),
        many => Value::Array(many.iter().map(normalize).collect()),
    }
}

pub fn normalize(value: &DynSolValue) -> Value {
    match value {
        DynSolValue::Uint(v, bits) if *bits <= 64 && v.bit_len() <= 64 => {
            Value::from(v.as_limbs()[0])
        }
        DynSolValue::Uint(v, _) => Value::String(v.to_string()),
        DynSolValue::Int(v, bits) if *bits <= 64 => {
            i64::try_from(*v).map(Value::from).unwrap_or_else(|_| Value::String(v.to_string()))
        }
        DynSolValue::Int(v, _) => Value::String(v.to_string()),
        DynSolValue::Address(a) => Value::String(a.to_checksum(None)),
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            Value::Array(items.iter().map(normalize).collect())
        }
        DynSolValue::String(s) => Value::String(s.clone()),
        // bytes of every width render as 0x hex
        other => Value::String(render(other)),
    }
}

pub fn normalize_receipt(receipt: &TransactionReceipt) -> Value {
    json!({
        "transactionHash": receipt.transaction_hash.to_string(),
        "blockNumber": receipt.block_number.map(|n| n.as_limbs()[0]),
        "gasUsed": receipt.gas_used.map(|g| g.as_limbs()[0]),
        "status": if receipt.succeeded() { "success" } else { "reverted" },
    })
}
