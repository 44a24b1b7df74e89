//! Tests for argument coercion and the wire codec

use abiconsole_abi::{
    coerce, coerce_args, decode, encode, encode_call, parse_descriptor, parse_type, ConsoleError,
    DynSolType, DynSolValue,
};
use alloy_primitives::{Address, I256, U256};

fn word(n: u64) -> String {
    format!("{:064x}", n)
}

fn words(parts: &[String]) -> Vec<u8> {
    hex::decode(parts.concat()).unwrap()
}

fn assert_malformed(result: abiconsole_abi::Result<Vec<DynSolValue>>) {
    match result {
        Err(ConsoleError::RemoteFailure(msg)) => assert!(msg.starts_with("malformed return data")),
        other => panic!("expected malformed return data, got {:?}", other),
    }
}

// ============================================================================
// CALL ENCODING
// ============================================================================

#[test]
fn test_encode_static_call() {
    let doc = r#"[{"type": "function", "name": "baz", "stateMutability": "pure",
        "inputs": [{"name": "x", "type": "uint32"}, {"name": "y", "type": "bool"}]}]"#;
    let op = &parse_descriptor(doc).unwrap()[0];

    let args = coerce_args(&op.inputs, &["69".to_string(), "true".to_string()]).unwrap();
    let data = encode_call(op, &args);

    let expected = format!("cdcd77c0{}{}", word(69), word(1));
    assert_eq!(hex::encode(data), expected);
}

#[test]
fn test_encode_dynamic_call() {
    let doc = r#"[{"type": "function", "name": "sam", "stateMutability": "pure",
        "inputs": [{"name": "a", "type": "bytes"}, {"name": "b", "type": "bool"},
                   {"name": "c", "type": "uint256[]"}]}]"#;
    let op = &parse_descriptor(doc).unwrap()[0];

    let raw = vec!["0x64617665".to_string(), "true".to_string(), "[1, 2, 3]".to_string()];
    let args = coerce_args(&op.inputs, &raw).unwrap();
    let data = encode_call(op, &args);

    let expected = [
        "a5643bf2".to_string(),
        word(0x60),
        word(1),
        word(0xa0),
        word(4),
        format!("{:0<64}", "64617665"),
        word(3),
        word(1),
        word(2),
        word(3),
    ]
    .concat();
    assert_eq!(hex::encode(data), expected);
}

#[test]
fn test_negative_int_encoding() {
    let value = coerce(&DynSolType::Int(256), "-1").unwrap();
    let encoded = encode(&[value]);
    assert!(encoded.iter().all(|&b| b == 0xff));
}

// ============================================================================
// DECODING
// ============================================================================

#[test]
fn test_decode_dynamic_payload() {
    let payload = words(&[
        word(0x60),
        word(1),
        word(0xa0),
        word(4),
        format!("{:0<64}", "64617665"),
        word(2),
        word(7),
        word(9),
    ]);
    let types = vec![
        DynSolType::Bytes,
        DynSolType::Bool,
        DynSolType::Array(Box::new(DynSolType::Uint(256))),
    ];

    let values = decode(&types, &payload).unwrap();
    assert_eq!(values[0], DynSolValue::Bytes(b"dave".to_vec()));
    assert_eq!(values[1], DynSolValue::Bool(true));
    assert_eq!(
        values[2],
        DynSolValue::Array(vec![
            DynSolValue::Uint(U256::from(7u8), 256),
            DynSolValue::Uint(U256::from(9u8), 256)
        ])
    );
}

#[test]
fn test_decode_tuple_of_dynamic_members() {
    let ty = parse_type("(string,uint64)").unwrap();
    let value = DynSolValue::Tuple(vec![
        DynSolValue::String("keccak".to_string()),
        DynSolValue::Uint(U256::from(3u8), 64),
    ]);
    let encoded = encode(&[value.clone()]);

    assert_eq!(decode(&[ty], &encoded).unwrap(), vec![value]);
}

#[test]
fn test_decode_signed_word() {
    let payload = words(&["f".repeat(64)]);
    let values = decode(&[DynSolType::Int(8)], &payload).unwrap();
    assert_eq!(values, vec![DynSolValue::Int(I256::MINUS_ONE, 8)]);
}

// ============================================================================
// DIRTY RETURN WORDS
// ============================================================================

#[test]
fn test_uint_word_wider_than_declared() {
    assert_malformed(decode(&[DynSolType::Uint(8)], &words(&[word(300)])));
}

#[test]
fn test_bool_word_other_than_zero_or_one() {
    assert_malformed(decode(&[DynSolType::Bool], &words(&[word(2)])));
}

#[test]
fn test_int_word_without_sign_extension() {
    // 0x80 is -128 only when the upper bytes repeat the sign bit
    assert_malformed(decode(&[DynSolType::Int(8)], &words(&[word(0x80)])));
}

#[test]
fn test_address_word_with_high_bytes() {
    let dirty = format!("01{:0>62}", "5e554947137a0dc0c153d3ba6542e2d34e68cf06");
    assert_malformed(decode(&[DynSolType::Address], &words(&[dirty])));

    let clean = format!("{:0>64}", "5e554947137a0dc0c153d3ba6542e2d34e68cf06");
    let values = decode(&[DynSolType::Address], &words(&[clean])).unwrap();
    let expected: Address = "0x5e554947137a0dc0c153d3ba6542e2d34e68cf06".parse().unwrap();
    assert_eq!(values, vec![DynSolValue::Address(expected)]);
}

#[test]
fn test_fixed_bytes_word_with_trailing_data() {
    let dirty = format!("{:0<64}", "deadbeef01");
    assert_malformed(decode(&[DynSolType::FixedBytes(4)], &words(&[dirty])));
}

// ============================================================================
// OVERSIZED TYPES
// ============================================================================

#[test]
fn test_huge_fixed_array_does_not_allocate() {
    let ty = DynSolType::FixedArray(Box::new(DynSolType::Uint(256)), 1 << 60);
    assert_malformed(decode(&[ty], &[0u8; 64]));
}

#[test]
fn test_nested_fixed_array_overflow() {
    assert!(parse_type("uint256[576460752303423488][64]").is_err());

    let ty = DynSolType::FixedArray(
        Box::new(DynSolType::FixedArray(Box::new(DynSolType::Uint(256)), 1 << 59)),
        64,
    );
    assert_malformed(decode(&[ty], &[0u8; 64]));
}

#[test]
fn test_payload_shorter_than_static_outputs() {
    let ty = parse_type("uint256[4]").unwrap();
    assert_malformed(decode(&[ty], &words(&[word(1), word(2), word(3)])));
}

// ============================================================================
// COERCION FAILURES
// ============================================================================

#[test]
fn test_empty_slot_is_encoding_failure() {
    let err = coerce(&DynSolType::Uint(256), "").unwrap_err();
    assert!(matches!(err, ConsoleError::EncodingFailure(_)));
}

#[test]
fn test_encoding_failure_names_argument() {
    let doc = r#"[{"type": "function", "name": "updateFee",
        "inputs": [{"name": "newFee", "type": "uint256"}]}]"#;
    let op = &parse_descriptor(doc).unwrap()[0];

    let err = coerce_args(&op.inputs, &["ten".to_string()]).unwrap_err();
    assert!(err.to_string().contains("newFee"));
}

#[test]
fn test_arity_mismatch() {
    let params = parse_descriptor(
        r#"[{"type": "function", "name": "f", "inputs": [{"name": "a", "type": "bool"}]}]"#,
    )
    .unwrap()[0]
        .inputs
        .clone();
    assert!(coerce_args(&params, &[]).is_err());
}

#[test]
fn test_array_needs_brackets() {
    let ty = parse_type("bytes32[]").unwrap();
    assert!(matches!(coerce(&ty, "0xabc"), Err(ConsoleError::EncodingFailure(_))));
}

#[test]
fn test_fixed_array_length_checked() {
    let ty = parse_type("bool[2]").unwrap();
    assert!(coerce(&ty, "[true]").is_err());
    assert!(coerce(&ty, "[true, false]").is_ok());
}

#[test]
fn test_tuple_slot() {
    let ty = parse_type("(uint64,bool)").unwrap();
    let value = coerce(&ty, "(3, true)").unwrap();
    assert_eq!(
        value,
        DynSolValue::Tuple(vec![DynSolValue::Uint(U256::from(3u8), 64), DynSolValue::Bool(true)])
    );
}

#[test]
fn test_uint256_max_accepted() {
    let max = U256::MAX.to_string();
    assert_eq!(coerce(&DynSolType::Uint(256), &max).unwrap(), DynSolValue::Uint(U256::MAX, 256));
}
