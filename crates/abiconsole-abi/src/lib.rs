//! abiconsole ABI
//!
//! Turns an interface descriptor (ABI) document into a registry of callable
//! operations, and converts arguments and return values between user text,
//! typed values and the contract wire format. Types, values and the wire
//! codec come from the alloy ABI crates; this crate adds descriptor
//! validation, overload-aware lookup and strict decoding on top.

pub mod codec;
pub mod parser;
pub mod registry;
pub mod revert;
pub mod types;
pub mod value;

pub use alloy_dyn_abi::{DynSolType, DynSolValue};
pub use codec::{decode, encode, encode_call};
pub use parser::{parse_descriptor, Mutability, OperationDescriptor, OperationKind};
pub use registry::{OperationClass, Registry};
pub use revert::describe_revert;
pub use types::{canonical, parse_type, Param};
pub use value::{coerce, coerce_args, parse_address, render};

// Re-export runtime types for convenience
pub use abiconsole_runtime::{ConsoleError, Result};
