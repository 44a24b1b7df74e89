//! Contract ABI wire codec
//!
//! Thin layer over alloy's parameter codec. Return data is decoded strictly:
//! it must be long enough for the declared outputs, every integer must fit
//! its width, and the payload must be the canonical encoding of the values
//! read from it, so dirty `bool` or `address` words are rejected.

use crate::parser::OperationDescriptor;
use crate::types::{check_type, min_words, WORD};
use crate::value::check_value;
use abiconsole_runtime::{ConsoleError, Result};
use alloy_dyn_abi::{DynSolType, DynSolValue};

/// Encodes a call: the operation's selector followed by the encoded arguments.
pub fn encode_call(operation: &OperationDescriptor, args: &[DynSolValue]) -> Vec<u8> {
    let mut data = operation.selector().to_vec();
    data.extend(encode(args));
    data
}

/// Encodes `values` as one top-level argument tuple.
pub fn encode(values: &[DynSolValue]) -> Vec<u8> {
    DynSolValue::Tuple(values.to_vec()).abi_encode_params()
}

/// Decodes return data as the sequence `types`.
pub fn decode(types: &[DynSolType], data: &[u8]) -> Result<Vec<DynSolValue>> {
    let ty = DynSolType::Tuple(types.to_vec());
    check_type(&ty).map_err(|e| malformed(&e))?;

    let needed = min_words(&ty)
        .and_then(|words| words.checked_mul(WORD))
        .ok_or_else(|| malformed("declared outputs are too large"))?;
    if data.len() < needed {
        return Err(malformed("payload is too short"));
    }

    let value = ty.abi_decode_params(data).map_err(|e| malformed(&e.to_string()))?;
    check_value(&value).map_err(|e| malformed(&e))?;
    if !data.starts_with(&value.abi_encode_params()) {
        return Err(malformed("payload is not a canonical encoding"));
    }

    match value {
        DynSolValue::Tuple(values) => Ok(values),
        other => Ok(vec![other]),
    }
}

fn malformed(msg: &str) -> ConsoleError {
    ConsoleError::remote_failure(format!("malformed return data: {}", msg))
}
