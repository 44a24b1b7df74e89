//! Text coercion into typed values, and their display form
//!
//! User input arrives as raw text, one slot per declared parameter. Slots are
//! read with [`DynSolType::coerce_str`]: scalars are bare literals, arrays are
//! written `[a, b]` and tuples `(a, b)`. Every coerced value is checked
//! against its declared width before it can reach the encoder.

use crate::types::{canonical, Param, WORD};
use abiconsole_runtime::{ConsoleError, Result};
use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, B256, U256};
use std::str::FromStr;

pub fn coerce_args(params: &[Param], args: &[String]) -> Result<Vec<DynSolValue>> {
    if params.len() != args.len() {
        return Err(ConsoleError::encoding_failure(format!(
            "expected {} arguments, got {}",
            params.len(),
            args.len()
        )));
    }

    params
        .iter()
        .zip(args)
        .map(|(param, text)| {
            coerce(&param.kind, text).map_err(|e| match e {
                ConsoleError::EncodingFailure(msg) => {
                    let label = if param.name.is_empty() { "<unnamed>" } else { &param.name };
                    ConsoleError::encoding_failure(format!("argument '{}': {}", label, msg))
                }
                other => other,
            })
        })
        .collect()
}

/// Reads one slot of text as a value of type `ty`
pub fn coerce(ty: &DynSolType, text: &str) -> Result<DynSolValue> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ConsoleError::encoding_failure(format!("empty value for {}", canonical(ty))));
    }

    let value = match ty {
        DynSolType::Address => DynSolValue::Address(parse_address(text)?),
        DynSolType::FixedBytes(size) => fixed_bytes(text, *size)?,
        _ => ty.coerce_str(text).map_err(|e| {
            ConsoleError::encoding_failure(format!("'{}' is not a valid {}: {}", text, canonical(ty), e))
        })?,
    };

    if !ty.matches(&value) {
        return Err(ConsoleError::encoding_failure(format!(
            "'{}' does not match {}",
            text,
            canonical(ty)
        )));
    }
    check_value(&value).map_err(ConsoleError::encoding_failure)?;
    Ok(value)
}

/// Reads an unsigned integer of `bits` width, decimal or `0x` hex
pub fn parse_uint(text: &str, bits: usize) -> Result<U256> {
    match coerce(&DynSolType::Uint(bits), text)? {
        DynSolValue::Uint(value, _) => Ok(value),
        other => Err(ConsoleError::encoding_failure(format!(
            "'{}' is not a valid uint{}: read as {}",
            text,
            bits,
            render(&other)
        ))),
    }
}

/// Parses a hex address. Mixed-case input carries an EIP-55 checksum that
/// must verify; all-lowercase or all-uppercase input is taken as is.
pub fn parse_address(text: &str) -> Result<Address> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());

    let parsed = if has_upper && has_lower {
        Address::parse_checksummed(text, None).map_err(|e| e.to_string())
    } else {
        Address::from_str(text).map_err(|e| e.to_string())
    };
    parsed.map_err(|e| {
        ConsoleError::encoding_failure(format!("'{}' is not a valid address: {}", text, e))
    })
}

fn fixed_bytes(text: &str, size: usize) -> Result<DynSolValue> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    if size > WORD || digits.len() != size * 2 {
        return Err(ConsoleError::encoding_failure(format!(
            "'{}' is not exactly {} bytes",
            text, size
        )));
    }
    let bytes = hex::decode(digits)
        .map_err(|e| ConsoleError::encoding_failure(format!("'{}' is not valid hex: {}", text, e)))?;

    let mut word = B256::ZERO;
    word[..size].copy_from_slice(&bytes);
    Ok(DynSolValue::FixedBytes(word, size))
}

/// Verifies that every integer fits its declared width and that fixed
/// bytes carry no data past their size.
pub(crate) fn check_value(value: &DynSolValue) -> std::result::Result<(), String> {
    match value {
        DynSolValue::Uint(v, bits) if *bits < 256 && v.bit_len() > *bits => {
            Err(format!("{} does not fit in uint{}", v, bits))
        }
        DynSolValue::Int(v, bits) if (1..256).contains(bits) => {
            // every bit above the sign bit must repeat it
            let high = v.into_raw() >> (*bits - 1);
            if high.is_zero() || high == U256::MAX >> (*bits - 1) {
                Ok(())
            } else {
                Err(format!("{} does not fit in int{}", v, bits))
            }
        }
        DynSolValue::FixedBytes(word, size) if word.iter().skip(*size).any(|&b| b != 0) => {
            Err(format!("bytes{} value has data past its size", size))
        }
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            items.iter().try_for_each(check_value)
        }
        _ => Ok(()),
    }
}

/// Display form of a value: checksummed addresses, `0x` hex bytes, quoted
/// strings, `[..]` arrays and `(..)` tuples.
pub fn render(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Uint(v, _) => v.to_string(),
        DynSolValue::Int(v, _) => v.to_string(),
        DynSolValue::Address(a) => a.to_checksum(None),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::FixedBytes(word, size) => format!("0x{}", hex::encode(&word[..(*size).min(WORD)])),
        DynSolValue::Bytes(b) => format!("0x{}", hex::encode(b)),
        DynSolValue::Function(f) => f.to_string(),
        DynSolValue::String(s) => format!("{:?}", s),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => format!("[{}]", joined(items)),
        DynSolValue::Tuple(items) => format!("({})", joined(items)),
        #[allow(unreachable_patterns)]
        _ => format!("{:?}", value),
    }
}

fn joined(items: &[DynSolValue]) -> String {
    items.iter().map(render).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_type;

    #[test]
    fn test_uint_bounds() {
        assert!(parse_uint("255", 8).is_ok());
        assert!(parse_uint("256", 8).is_err());
        assert!(parse_uint("0xff", 8).is_ok());
        assert!(parse_uint("", 8).is_err());
    }

    #[test]
    fn test_int_bounds() {
        assert_eq!(render(&coerce(&DynSolType::Int(8), "-128").unwrap()), "-128");
        assert!(coerce(&DynSolType::Int(8), "128").is_err());
        assert!(coerce(&DynSolType::Int(8), "-129").is_err());
    }

    #[test]
    fn test_nested_array() {
        let ty = parse_type("uint8[][]").unwrap();
        let value = coerce(&ty, "[[1, 2], []]").unwrap();
        assert_eq!(render(&value), "[[1, 2], []]");
    }

    #[test]
    fn test_fixed_bytes_length_is_exact() {
        assert!(coerce(&DynSolType::FixedBytes(2), "0xabcd").is_ok());
        assert!(coerce(&DynSolType::FixedBytes(2), "0xab").is_err());
    }

    #[test]
    fn test_bad_checksum_rejected() {
        // valid lowercase, broken mixed case
        assert!(coerce(&DynSolType::Address, "0x5e554947137a0dc0c153d3ba6542e2d34e68cf06").is_ok());
        assert!(coerce(&DynSolType::Address, "0x5E554947137a0dc0c153d3ba6542e2d34e68cf06").is_err());
    }

    #[test]
    fn test_check_value_int_widths() {
        use alloy_primitives::I256;

        assert!(check_value(&DynSolValue::Int(I256::MINUS_ONE, 8)).is_ok());
        assert!(check_value(&DynSolValue::Int("127".parse::<I256>().unwrap(), 8)).is_ok());
        assert!(check_value(&DynSolValue::Int("128".parse::<I256>().unwrap(), 8)).is_err());
        assert!(check_value(&DynSolValue::Int("-129".parse::<I256>().unwrap(), 8)).is_err());
        assert!(check_value(&DynSolValue::Uint(U256::from(300u16), 8)).is_err());
    }
}
