//! Invocation outcomes and per-invocation state

use abiconsole_abi::OperationClass;
use abiconsole_runtime::{ConsoleError, ErrorKind, InvocationId};
use alloy_primitives::B256;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

/// Exactly one outcome per invocation; there are no partial results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExecutionOutcome {
    Success(Value),
    Failure(Failure),
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn failure_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Failure(failure) => Some(failure.kind),
            Self::Success(_) => None,
        }
    }
}

impl From<ConsoleError> for Failure {
    fn from(error: ConsoleError) -> Self {
        let message = match &error {
            // the variant name already travels in `kind`
            ConsoleError::MalformedDescriptor(msg)
            | ConsoleError::NotInitialized(msg)
            | ConsoleError::EncodingFailure(msg)
            | ConsoleError::RemoteFailure(msg)
            | ConsoleError::FormattingFailure(msg)
            | ConsoleError::Config(msg) => msg.clone(),
            other => other.to_string(),
        };
        Self { kind: error.kind(), message }
    }
}

impl From<ConsoleError> for ExecutionOutcome {
    fn from(error: ConsoleError) -> Self {
        Self::Failure(error.into())
    }
}

/// Where an invocation currently stands
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InvocationState {
    ArgsAssembled,
    ReadPending,
    WritePending,
    Confirming { transaction: B256 },
    Resolved(ExecutionOutcome),
}

impl InvocationState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// The result of one call to [`Session::invoke`](crate::Session::invoke)
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub id: InvocationId,
    pub operation: String,
    pub class: Option<OperationClass>,
    /// Generation of the handle the invocation ran against
    pub generation: Option<u64>,
    pub outcome: ExecutionOutcome,
}
