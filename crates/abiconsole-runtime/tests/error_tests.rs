//! Integration tests for error handling in abiconsole-runtime

use abiconsole_runtime::{ConsoleError, ErrorKind};

#[test]
fn test_malformed_descriptor_error_message() {
    let error = ConsoleError::malformed_descriptor("record 3 is missing 'type'");

    let error_msg = error.to_string();
    assert!(error_msg.contains("Malformed descriptor"));
    assert!(error_msg.contains("record 3 is missing 'type'"));
}

#[test]
fn test_not_initialized_error_message() {
    let error = ConsoleError::not_initialized("connect a wallet first");

    let error_msg = error.to_string();
    assert!(error_msg.contains("Not initialized"));
    assert!(error_msg.contains("connect a wallet first"));
}

#[test]
fn test_remote_failure_is_verbatim() {
    let error = ConsoleError::remote_failure("execution reverted: Ownable: caller is not the owner");

    assert_eq!(error.to_string(), "execution reverted: Ownable: caller is not the owner");
}

#[test]
fn test_ambiguous_operation_lists_candidates() {
    let error = ConsoleError::AmbiguousOperation {
        name: "mint".to_string(),
        candidates: vec!["mint(address)".to_string(), "mint(address,uint256)".to_string()],
    };

    let error_msg = error.to_string();
    assert!(error_msg.contains("'mint'"));
    assert!(error_msg.contains("mint(address), mint(address,uint256)"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: ConsoleError = io_error.into();

    let error_msg = error.to_string();
    assert!(error_msg.contains("I/O error"));
    assert!(error_msg.contains("file not found"));
    assert_eq!(error.kind(), ErrorKind::Io);
}

#[test]
fn test_error_kind_display() {
    assert_eq!(ErrorKind::NotInitialized.to_string(), "NotInitialized");
    assert_eq!(ErrorKind::EncodingFailure.to_string(), "EncodingFailure");
}

#[test]
fn test_error_kind_serialization() {
    let json = serde_json::to_string(&ErrorKind::RemoteFailure).unwrap();
    assert_eq!(json, "\"RemoteFailure\"");
}

#[test]
fn test_error_debug_format() {
    let error = ConsoleError::formatting_failure("test");
    let debug_output = format!("{:?}", error);

    assert!(debug_output.contains("FormattingFailure"));
}

#[test]
fn test_result_type_err() {
    use abiconsole_runtime::Result;

    let result: Result<i32> = Err(ConsoleError::encoding_failure("bad uint"));
    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.kind(), ErrorKind::EncodingFailure);
    }
}
