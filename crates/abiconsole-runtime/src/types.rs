//! Core types for the abiconsole toolkit
//!
//! This module defines the session-level data shared by every abiconsole
//! component: the explicit configuration a session is built from and the
//! identifiers used to report invocation outcomes.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default interval between receipt polls while confirming a submission
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1_000);

/// Immutable configuration for one interaction session
///
/// A `SessionConfig` binds a single contract address to the interface
/// descriptor document describing it. Both are fixed for the lifetime of a
/// session; there is no process-wide default.
///
/// # Examples
///
/// ```
/// use abiconsole_runtime::SessionConfig;
/// use alloy_primitives::Address;
///
/// let config = SessionConfig::new(Address::ZERO, "[]");
/// assert_eq!(config.descriptor(), "[]");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Address of the contract instance the session talks to
    contract_address: Address,
    /// Raw interface descriptor (ABI) document
    descriptor: String,
    /// How often a pending submission is polled for its receipt
    poll_interval: Duration,
}

impl SessionConfig {
    pub fn new(contract_address: Address, descriptor: impl Into<String>) -> Self {
        Self {
            contract_address,
            descriptor: descriptor.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

/// Identity of one invocation, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InvocationId(u64);

impl InvocationId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
