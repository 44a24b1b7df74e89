//! Remote handle bound to one contract address and capability

use crate::provider::{Provider, ProviderError, TransactionReceipt, TransactionRequest};
use crate::wallet::Capability;
use abiconsole_abi::{
    coerce_args, decode, describe_revert, encode_call, DynSolValue, OperationDescriptor, Registry,
};
use abiconsole_runtime::{ConsoleError, Result};
use alloy_primitives::{Address, Bytes, B256, U256};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// `(contract address, registry, capability)` bound together for one
/// generation of a session
///
/// Handles are never mutated: a capability change produces a new handle.
#[derive(Debug)]
pub struct ContractHandle {
    address: Address,
    registry: Arc<Registry>,
    capability: Capability,
    generation: u64,
    poll_interval: Duration,
}

/// A submission accepted by the remote system, awaiting inclusion
pub struct PendingTransaction {
    hash: B256,
    provider: Arc<dyn Provider>,
    registry: Arc<Registry>,
    poll_interval: Duration,
}

impl ContractHandle {
    pub fn new(
        address: Address,
        registry: Arc<Registry>,
        capability: Capability,
        generation: u64,
        poll_interval: Duration,
    ) -> Self {
        Self { address, registry, capability, generation, poll_interval }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Runs a read operation and decodes its declared outputs.
    pub async fn call(
        &self,
        operation: &OperationDescriptor,
        args: &[String],
    ) -> Result<Vec<DynSolValue>> {
        let values = coerce_args(&operation.inputs, args)?;
        let tx = TransactionRequest {
            from: self.capability.account(),
            to: self.address,
            data: Bytes::from(encode_call(operation, &values)),
            value: None,
        };

        debug!(operation = %operation.signature(), generation = self.generation, "querying");
        let raw = self
            .capability
            .provider()
            .call(&tx)
            .await
            .map_err(|e| remote_error(e, &self.registry))?;

        decode(&operation.output_types(), &raw)
    }

    /// Submits a write operation; the returned transaction still has to be
    /// confirmed.
    pub async fn submit(
        &self,
        operation: &OperationDescriptor,
        args: &[String],
        fee: Option<U256>,
    ) -> Result<PendingTransaction> {
        let from = self.capability.account().ok_or_else(|| {
            ConsoleError::not_initialized("write operations need a connected signing account")
        })?;
        let values = coerce_args(&operation.inputs, args)?;
        let tx = TransactionRequest {
            from: Some(from),
            to: self.address,
            data: Bytes::from(encode_call(operation, &values)),
            value: fee,
        };

        let hash = self
            .capability
            .provider()
            .send_transaction(&tx)
            .await
            .map_err(|e| remote_error(e, &self.registry))?;

        info!(operation = %operation.signature(), %hash, "submission accepted");
        Ok(PendingTransaction {
            hash,
            provider: Arc::clone(self.capability.provider()),
            registry: Arc::clone(&self.registry),
            poll_interval: self.poll_interval,
        })
    }
}

impl PendingTransaction {
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// Waits, without a timeout, until the transaction is included.
    ///
    /// A receipt reporting failure is a [`ConsoleError::RemoteFailure`].
    pub async fn confirm(self) -> Result<TransactionReceipt> {
        loop {
            let receipt = self
                .provider
                .transaction_receipt(self.hash)
                .await
                .map_err(|e| remote_error(e, &self.registry))?;

            match receipt {
                Some(receipt) if receipt.succeeded() => {
                    info!(hash = %self.hash, "transaction confirmed");
                    return Ok(receipt);
                }
                Some(receipt) => {
                    let block = receipt.block_number.map(|b| b.to_string()).unwrap_or_default();
                    return Err(ConsoleError::remote_failure(format!(
                        "transaction {} reverted in block {}",
                        self.hash, block
                    )));
                }
                None => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }
}

impl fmt::Debug for PendingTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTransaction").field("hash", &self.hash).finish_non_exhaustive()
    }
}

/// Maps a provider error to a remote failure with the most specific message.
fn remote_error(error: ProviderError, registry: &Registry) -> ConsoleError {
    match error.revert_data() {
        Some(data) => ConsoleError::remote_failure(describe_revert(data, registry)),
        None => ConsoleError::remote_failure(error.to_string()),
    }
}
