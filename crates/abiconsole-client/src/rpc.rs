//! JSON-RPC 2.0 provider over HTTP

use crate::provider::{Provider, ProviderError, TransactionReceipt, TransactionRequest};
use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

const NO_PARAMS: [(); 0] = [];

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P: Serialize> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Provider backed by a node's JSON-RPC endpoint
///
/// Signing is delegated to the node (`eth_sendTransaction`), so the endpoint
/// must manage the account it reports from `eth_accounts`.
#[derive(Debug)]
pub struct HttpProvider {
    url: Url,
    client: Client,
    next_id: AtomicU64,
}

impl HttpProvider {
    pub fn new(url: &str) -> Result<Self, ProviderError> {
        let url = Url::parse(url)
            .map_err(|e| ProviderError::Transport(format!("invalid RPC URL '{}': {}", url, e)))?;
        Ok(Self::with_client(Client::new(), url))
    }

    pub fn with_client(client: Client, url: Url) -> Self {
        Self { url, client, next_id: AtomicU64::new(1) }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn request<P, R>(&self, method: &str, params: P) -> Result<R, ProviderError>
    where
        P: Serialize + Send + Sync,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest { jsonrpc: "2.0", id, method, params };
        debug!(method, id, "sending JSON-RPC request");

        let response = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("HTTP error: {}", e)))?;

        let response: RpcResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("{}: {}", method, e)))?;

        if let Some(error) = response.error {
            trace!(method, id, code = error.code, "JSON-RPC error response");
            return Err(ProviderError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data.as_ref().and_then(revert_bytes),
            });
        }

        serde_json::from_value(response.result.unwrap_or(Value::Null))
            .map_err(|e| ProviderError::InvalidResponse(format!("{}: {}", method, e)))
    }
}

/// Revert data arrives as a hex string, or nested as `{ "data": "0x..." }`
fn revert_bytes(data: &Value) -> Option<Bytes> {
    match data {
        Value::String(s) => Bytes::from_str(s).ok(),
        Value::Object(map) => map.get("data").and_then(revert_bytes),
        _ => None,
    }
}

#[async_trait]
impl Provider for HttpProvider {
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.request("eth_accounts", NO_PARAMS).await
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.request("eth_requestAccounts", NO_PARAMS).await
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes, ProviderError> {
        self.request("eth_call", (tx, "latest")).await
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, ProviderError> {
        self.request("eth_sendTransaction", [tx]).await
    }

    async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, ProviderError> {
        self.request("eth_getTransactionReceipt", [hash]).await
    }
}
