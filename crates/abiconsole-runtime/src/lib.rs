//! abiconsole Runtime
//!
//! Shared runtime utilities and core types for the abiconsole toolkit.
//! This crate provides the error taxonomy and session types used across
//! all abiconsole components.

pub mod error;
pub mod types;

// Re-export core types for convenience
pub use error::{ConsoleError, ErrorKind, Result};
pub use types::{InvocationId, SessionConfig, DEFAULT_POLL_INTERVAL};

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use std::time::Duration;

    #[test]
    fn test_session_config_defaults() {
        let config = SessionConfig::new(Address::ZERO, "[]");
        assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);
        assert_eq!(config.contract_address(), Address::ZERO);
    }

    #[test]
    fn test_session_config_poll_interval_override() {
        let config =
            SessionConfig::new(Address::ZERO, "[]").with_poll_interval(Duration::from_millis(5));
        assert_eq!(config.poll_interval(), Duration::from_millis(5));
    }

    #[test]
    fn test_invocation_id_ordering() {
        assert!(InvocationId::new(1) < InvocationId::new(2));
        assert_eq!(InvocationId::new(7).to_string(), "#7");
    }

    #[test]
    fn test_error_kind_matches_variant() {
        assert_eq!(ConsoleError::not_initialized("x").kind(), ErrorKind::NotInitialized);
        assert_eq!(ConsoleError::remote_failure("x").kind(), ErrorKind::RemoteFailure);
    }
}
