//! Signing/reading capability provider seam
//!
//! A [`Provider`] is the external collaborator that knows the active account
//! and can read from, and submit transactions to, the remote system. The
//! core never performs the connection handshake itself; it only consumes
//! this interface.

use alloy_primitives::{Address, Bytes, B256, U256, U64};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),

    /// Error object returned by the remote system
    #[error("{message}")]
    Rpc { code: i64, message: String, data: Option<Bytes> },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc { code, message: message.into(), data: None }
    }

    pub fn reverted(data: Bytes) -> Self {
        Self::Rpc { code: 3, message: "execution reverted".to_string(), data: Some(data) }
    }

    /// Revert payload attached to the error, if any
    pub fn revert_data(&self) -> Option<&Bytes> {
        match self {
            Self::Rpc { data: Some(data), .. } if !data.is_empty() => Some(data),
            _ => None,
        }
    }

    /// EIP-1193 code 4001: the user declined the request
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::Rpc { code: 4001, .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<U64>,
    #[serde(default)]
    pub gas_used: Option<U64>,
    /// 1 on success, 0 on revert; absent on pre-Byzantium receipts
    #[serde(default)]
    pub status: Option<U64>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        self.status.map_or(true, |status| !status.is_zero())
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    /// Accounts already exposed to this client, active account first
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Asks the host to expose an account; may wait on user approval
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Executes a read-only call and returns the raw return data
    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, ProviderError>;

    /// Signs and submits a transaction, returning its hash once accepted
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, ProviderError>;

    /// Receipt of a mined transaction, `None` while it is still pending
    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, ProviderError>;
}
