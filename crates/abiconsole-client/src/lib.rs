//! abiconsole Client
//!
//! Invokes the operations of one deployed contract with no
//! operation-specific code. A [`Session`] resolves an operation in its
//! registry, assembles the argument text from the [`InputStore`], dispatches
//! through the bound [`ContractHandle`] and records one
//! [`ExecutionOutcome`] per invocation.

pub mod formatter;
pub mod handle;
pub mod inputs;
pub mod normalize;
pub mod outcome;
pub mod provider;
pub mod rpc;
pub mod session;
pub mod wallet;

pub use formatter::{format_outcome, format_success, Report};
pub use handle::{ContractHandle, PendingTransaction};
pub use inputs::InputStore;
pub use normalize::{normalize, normalize_outputs, normalize_receipt};
pub use outcome::{ExecutionOutcome, Failure, Invocation, InvocationState};
pub use provider::{Provider, ProviderError, TransactionReceipt, TransactionRequest};
pub use rpc::HttpProvider;
pub use session::{Session, RETAINED_OUTCOMES};
pub use wallet::{connect, Capability};

// Re-export runtime types for convenience
pub use abiconsole_runtime::{ConsoleError, ErrorKind, InvocationId, Result, SessionConfig};
