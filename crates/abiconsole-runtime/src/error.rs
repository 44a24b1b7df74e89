//! Error types for the abiconsole toolkit

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for abiconsole operations
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Main error type for abiconsole operations
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The interface descriptor document failed structural validation
    #[error("Malformed descriptor: {0}")]
    MalformedDescriptor(String),

    /// An invocation was attempted with no bound remote handle
    #[error("Not initialized: {0}")]
    NotInitialized(String),

    /// An argument could not be converted to its declared parameter type
    #[error("Encoding failure: {0}")]
    EncodingFailure(String),

    /// The remote call, the submission or its confirmation reported an error
    #[error("{0}")]
    RemoteFailure(String),

    /// A successful payload could not be rendered
    #[error("Formatting failure: {0}")]
    FormattingFailure(String),

    /// No function with this name or signature is registered
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// A bare name matched several overloads
    #[error("Ambiguous operation '{name}', use one of: {}", candidates.join(", "))]
    AmbiguousOperation { name: String, candidates: Vec<String> },

    /// Invalid session or CLI configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConsoleError {
    pub fn malformed_descriptor(msg: impl Into<String>) -> Self {
        Self::MalformedDescriptor(msg.into())
    }

    pub fn not_initialized(msg: impl Into<String>) -> Self {
        Self::NotInitialized(msg.into())
    }

    pub fn encoding_failure(msg: impl Into<String>) -> Self {
        Self::EncodingFailure(msg.into())
    }

    pub fn remote_failure(msg: impl Into<String>) -> Self {
        Self::RemoteFailure(msg.into())
    }

    pub fn formatting_failure(msg: impl Into<String>) -> Self {
        Self::FormattingFailure(msg.into())
    }

    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation(name.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The fieldless tag of this error, used to label failed outcomes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedDescriptor(_) => ErrorKind::MalformedDescriptor,
            Self::NotInitialized(_) => ErrorKind::NotInitialized,
            Self::EncodingFailure(_) => ErrorKind::EncodingFailure,
            Self::RemoteFailure(_) => ErrorKind::RemoteFailure,
            Self::FormattingFailure(_) => ErrorKind::FormattingFailure,
            Self::UnknownOperation(_) => ErrorKind::UnknownOperation,
            Self::AmbiguousOperation { .. } => ErrorKind::AmbiguousOperation,
            Self::Config(_) => ErrorKind::Config,
            Self::IoError(_) => ErrorKind::Io,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    MalformedDescriptor,
    NotInitialized,
    EncodingFailure,
    RemoteFailure,
    FormattingFailure,
    UnknownOperation,
    AmbiguousOperation,
    Config,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::MalformedDescriptor => "MalformedDescriptor",
            Self::NotInitialized => "NotInitialized",
            Self::EncodingFailure => "EncodingFailure",
            Self::RemoteFailure => "RemoteFailure",
            Self::FormattingFailure => "FormattingFailure",
            Self::UnknownOperation => "UnknownOperation",
            Self::AmbiguousOperation => "AmbiguousOperation",
            Self::Config => "Config",
            Self::Io => "Io",
        };
        f.write_str(label)
    }
}
