//! Wallet connection
//!
//! Obtains a [`Capability`] from a [`Provider`]: the active account when one
//! is already exposed, otherwise whatever account the host approves.

use crate::provider::Provider;
use abiconsole_runtime::{ConsoleError, Result};
use alloy_primitives::Address;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// A provider plus the account it signs for
///
/// A capability without an account can only serve read operations.
#[derive(Clone)]
pub struct Capability {
    provider: Arc<dyn Provider>,
    account: Option<Address>,
}

impl Capability {
    pub fn signer(provider: Arc<dyn Provider>, account: Address) -> Self {
        Self { provider, account: Some(account) }
    }

    pub fn read_only(provider: Arc<dyn Provider>) -> Self {
        Self { provider, account: None }
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability").field("account", &self.account).finish_non_exhaustive()
    }
}

/// The account currently exposed by the provider, if any
pub async fn active_account(provider: &dyn Provider) -> Result<Option<Address>> {
    let accounts = provider
        .accounts()
        .await
        .map_err(|e| ConsoleError::remote_failure(e.to_string()))?;
    Ok(accounts.first().copied())
}

/// Asks the host for an account, waiting on its approval
pub async fn request_connection(provider: &dyn Provider) -> Result<Address> {
    let accounts = provider.request_accounts().await.map_err(|e| {
        if e.is_user_rejection() {
            ConsoleError::not_initialized(format!("connection rejected: {}", e))
        } else {
            ConsoleError::remote_failure(e.to_string())
        }
    })?;
    accounts
        .first()
        .copied()
        .ok_or_else(|| ConsoleError::not_initialized("provider exposed no account"))
}

/// Connects to `provider`, requesting access only when no account is active.
pub async fn connect(provider: Arc<dyn Provider>) -> Result<Capability> {
    let account = match active_account(provider.as_ref()).await? {
        Some(account) => account,
        None => request_connection(provider.as_ref()).await?,
    };
    info!(%account, "wallet connected");
    Ok(Capability::signer(provider, account))
}
