//! Result formatter
//!
//! Every outcome renders to exactly one of two message shapes. Rendering never
//! fails: a payload that cannot be encoded is reported as a failure message.

use crate::outcome::{ExecutionOutcome, Failure};
use abiconsole_runtime::ConsoleError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Success(String),
    Failure(String),
}

impl Report {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success(msg) | Self::Failure(msg) => msg,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

pub fn format_outcome(outcome: &ExecutionOutcome) -> Report {
    match outcome {
        ExecutionOutcome::Success(payload) => format_success(payload),
        ExecutionOutcome::Failure(failure) => format_failure(failure),
    }
}

/// Renders any serializable payload as a success message.
///
/// JSON keeps arrays and scalars distinguishable and carries wide integers
/// as their exact decimal strings.
pub fn format_success<T: Serialize + ?Sized>(payload: &T) -> Report {
    match serde_json::to_string(payload) {
        Ok(json) => Report::Success(format!("✅ Success: {}", json)),
        Err(e) => format_failure(&Failure::from(ConsoleError::formatting_failure(e.to_string()))),
    }
}

pub fn format_failure(failure: &Failure) -> Report {
    Report::Failure(format!("❌ Error [{}]: {}", failure.kind, failure.message))
}
