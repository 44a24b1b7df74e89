//! Execution session
//!
//! A [`Session`] owns the registry built from one descriptor document, the
//! input store, and the currently bound [`ContractHandle`]. Every call to
//! [`Session::invoke`] gets its own [`InvocationId`] and its outcome is
//! recorded on a board keyed by that id, so concurrent invocations never
//! overwrite each other's results. The board tracks every invocation in
//! flight but keeps only the latest [`RETAINED_OUTCOMES`] resolved ones.

use crate::handle::ContractHandle;
use crate::inputs::InputStore;
use crate::normalize::{normalize_outputs, normalize_receipt};
use crate::outcome::{ExecutionOutcome, Invocation, InvocationState};
use crate::wallet::{active_account, Capability};
use abiconsole_abi::value::parse_uint;
use abiconsole_abi::{Mutability, OperationClass, OperationDescriptor, Registry};
use abiconsole_exporter::{summarize, InterfaceSummary};
use abiconsole_runtime::{ConsoleError, InvocationId, Result, SessionConfig};
use alloy_primitives::{Address, U256};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Session {
    config: SessionConfig,
    registry: RwLock<Arc<Registry>>,
    summary: RwLock<InterfaceSummary>,
    inputs: Mutex<InputStore>,
    handle: RwLock<Option<Arc<ContractHandle>>>,
    generation: AtomicU64,
    next_invocation: AtomicU64,
    board: Mutex<Board>,
}

/// Resolved outcomes kept for [`Session::outcome`] lookups
pub const RETAINED_OUTCOMES: usize = 128;

#[derive(Default)]
struct Board {
    pending: BTreeMap<InvocationId, InvocationState>,
    resolved: BTreeMap<InvocationId, ExecutionOutcome>,
}

impl Board {
    fn record(&mut self, id: InvocationId, state: InvocationState) {
        match state {
            InvocationState::Resolved(outcome) => {
                self.pending.remove(&id);
                self.resolved.insert(id, outcome);
                // ids grow monotonically, so the first entry is the oldest
                while self.resolved.len() > RETAINED_OUTCOMES {
                    self.resolved.pop_first();
                }
            }
            state => {
                self.pending.insert(id, state);
            }
        }
    }
}

/// What an invocation resolved to before its outcome is known
#[derive(Default)]
struct Target {
    operation: Option<String>,
    class: Option<OperationClass>,
    generation: Option<u64>,
}

impl Session {
    /// Builds the registry from the configured descriptor document.
    ///
    /// A malformed document fails the whole session; no partial registry is
    /// ever exposed.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let registry = Registry::from_document(config.descriptor())?;
        info!(
            address = %config.contract_address(),
            operations = registry.len(),
            "session initialized"
        );

        Ok(Self {
            summary: RwLock::new(summarize(&registry)),
            registry: RwLock::new(Arc::new(registry)),
            inputs: Mutex::new(InputStore::new()),
            handle: RwLock::new(None),
            generation: AtomicU64::new(0),
            next_invocation: AtomicU64::new(0),
            board: Mutex::new(Board::default()),
            config,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn contract_address(&self) -> Address {
        self.config.contract_address()
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry.read())
    }

    pub fn summary(&self) -> InterfaceSummary {
        self.summary.read().clone()
    }

    /// Replaces the registry with one built from `document`.
    ///
    /// On failure the previous registry, summary and inputs are kept. On
    /// success the inputs are cleared and a bound handle is rebuilt against
    /// the new registry.
    pub fn reload(&self, document: &str) -> Result<()> {
        let registry = Arc::new(Registry::from_document(document)?);
        let summary = summarize(&registry);

        let mut current = self.registry.write();
        *current = Arc::clone(&registry);
        *self.summary.write() = summary;
        self.inputs.lock().clear();

        let capability = self.handle.read().as_ref().map(|h| h.capability().clone());
        if let Some(capability) = capability {
            self.install(capability, Arc::clone(&registry));
        }
        drop(current);

        info!(operations = registry.len(), "descriptor reloaded");
        Ok(())
    }

    /// Binds a new handle for `capability` and returns its generation.
    ///
    /// Invocations already running keep the handle they started with.
    pub fn bind(&self, capability: Capability) -> u64 {
        let registry = self.registry();
        self.install(capability, registry)
    }

    pub fn unbind(&self) {
        if self.handle.write().take().is_some() {
            info!("contract handle unbound");
        }
    }

    pub fn is_bound(&self) -> bool {
        self.handle.read().is_some()
    }

    pub fn generation(&self) -> Option<u64> {
        self.handle.read().as_ref().map(|h| h.generation())
    }

    pub fn bound_account(&self) -> Option<Address> {
        self.handle.read().as_ref().and_then(|h| h.capability().account())
    }

    /// Re-reads the provider's active account and rebinds when it changed.
    ///
    /// Returns the new generation, or `None` when nothing changed. A handle
    /// bound while the account query was running is left in place.
    pub async fn refresh_account(&self) -> Result<Option<u64>> {
        let current = self
            .handle
            .read()
            .clone()
            .ok_or_else(|| ConsoleError::not_initialized("no contract handle is bound"))?;
        let capability = current.capability();

        let account = active_account(capability.provider().as_ref()).await?;
        if account == capability.account() {
            return Ok(None);
        }

        let provider = Arc::clone(capability.provider());
        let next = match account {
            Some(account) => Capability::signer(provider, account),
            None => Capability::read_only(provider),
        };

        let registry = self.registry();
        let mut slot = self.handle.write();
        if slot.as_ref().map(|h| h.generation()) != Some(current.generation()) {
            debug!(
                stale = current.generation(),
                "handle changed during account refresh, keeping the newer binding"
            );
            return Ok(None);
        }
        Ok(Some(self.install_into(&mut slot, next, registry)))
    }

    /// Stores the text for one argument slot of `operation`.
    pub fn set_slot(&self, operation: &str, index: usize, value: impl Into<String>) -> Result<()> {
        let registry = self.registry();
        let descriptor = registry.lookup(operation)?;
        if index >= descriptor.arity() {
            return Err(ConsoleError::encoding_failure(format!(
                "{} takes {} argument(s), slot {} does not exist",
                descriptor.signature(),
                descriptor.arity(),
                index
            )));
        }
        let key = registry.operation_key(descriptor);
        self.inputs.lock().set_slot(&key, index, value);
        Ok(())
    }

    /// Current argument text for `operation`, one entry per declared input.
    pub fn args(&self, operation: &str) -> Result<Vec<String>> {
        let registry = self.registry();
        let descriptor = registry.lookup(operation)?;
        let key = registry.operation_key(descriptor);
        Ok(self.inputs.lock().args(&key, descriptor.arity()))
    }

    /// Stores the value to attach to a payable operation; empty text clears it.
    pub fn set_fee(&self, operation: &str, value: impl Into<String>) -> Result<()> {
        let registry = self.registry();
        let key = registry.operation_key(registry.lookup(operation)?);
        let value = value.into();
        let mut inputs = self.inputs.lock();
        if value.trim().is_empty() {
            inputs.clear_fee(&key);
        } else {
            inputs.set_fee(&key, value);
        }
        Ok(())
    }

    /// Runs `operation` against the latest bound handle.
    ///
    /// Never fails: every error becomes the invocation's failure outcome.
    pub async fn invoke(&self, operation: &str) -> Invocation {
        let id = InvocationId::new(self.next_invocation.fetch_add(1, Ordering::SeqCst) + 1);
        let mut target = Target::default();
        debug!(%id, operation, "invocation started");

        let outcome = match self.dispatch(id, operation, &mut target).await {
            Ok(payload) => {
                info!(%id, operation, "invocation succeeded");
                ExecutionOutcome::Success(payload)
            }
            Err(e) => {
                warn!(%id, operation, error = %e, "invocation failed");
                ExecutionOutcome::from(e)
            }
        };

        self.record(id, InvocationState::Resolved(outcome.clone()));
        Invocation {
            id,
            operation: target.operation.unwrap_or_else(|| operation.to_string()),
            class: target.class,
            generation: target.generation,
            outcome,
        }
    }

    /// Latest recorded state of an invocation
    pub fn state(&self, id: InvocationId) -> Option<InvocationState> {
        let board = self.board.lock();
        match board.pending.get(&id) {
            Some(state) => Some(state.clone()),
            None => board.resolved.get(&id).cloned().map(InvocationState::Resolved),
        }
    }

    /// The outcome of an invocation once it has resolved
    pub fn outcome(&self, id: InvocationId) -> Option<ExecutionOutcome> {
        self.board.lock().resolved.get(&id).cloned()
    }

    /// Removes and returns a resolved outcome.
    pub fn take_outcome(&self, id: InvocationId) -> Option<ExecutionOutcome> {
        self.board.lock().resolved.remove(&id)
    }

    /// Invocations that have not resolved yet
    pub fn in_flight(&self) -> Vec<InvocationId> {
        self.board.lock().pending.keys().copied().collect()
    }

    /// Number of invocations the board currently tracks, in flight or resolved
    pub fn tracked(&self) -> usize {
        let board = self.board.lock();
        board.pending.len() + board.resolved.len()
    }

    async fn dispatch(&self, id: InvocationId, key: &str, target: &mut Target) -> Result<Value> {
        let handle = self.handle.read().clone().ok_or_else(|| {
            ConsoleError::not_initialized("no contract handle is bound, connect a wallet first")
        })?;
        target.generation = Some(handle.generation());

        let registry = Arc::clone(handle.registry());
        let descriptor = registry.lookup(key)?;
        let operation = registry.operation_key(descriptor);
        let class = OperationClass::of(descriptor);
        target.operation = Some(operation.clone());
        target.class = Some(class);

        let (args, fee) = {
            let inputs = self.inputs.lock();
            (inputs.args(&operation, descriptor.arity()), inputs.fee(&operation).map(str::to_string))
        };
        self.record(id, InvocationState::ArgsAssembled);

        match class {
            OperationClass::Read => {
                self.record(id, InvocationState::ReadPending);
                let values = handle.call(descriptor, &args).await?;
                Ok(normalize_outputs(&values))
            }
            OperationClass::Write => {
                let value = attached_value(descriptor, fee.as_deref())?;
                self.record(id, InvocationState::WritePending);
                let pending = handle.submit(descriptor, &args, value).await?;
                self.record(id, InvocationState::Confirming { transaction: pending.hash() });
                let receipt = pending.confirm().await?;
                Ok(normalize_receipt(&receipt))
            }
        }
    }

    fn install(&self, capability: Capability, registry: Arc<Registry>) -> u64 {
        let mut slot = self.handle.write();
        self.install_into(&mut slot, capability, registry)
    }

    fn install_into(
        &self,
        slot: &mut Option<Arc<ContractHandle>>,
        capability: Capability,
        registry: Arc<Registry>,
    ) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let account = capability.account();
        let handle = ContractHandle::new(
            self.config.contract_address(),
            registry,
            capability,
            generation,
            self.config.poll_interval(),
        );
        *slot = Some(Arc::new(handle));
        info!(generation, account = ?account, "contract handle bound");
        generation
    }

    fn record(&self, id: InvocationId, state: InvocationState) {
        self.board.lock().record(id, state);
    }
}

/// The value sent with a write: the fee for payable operations, zero when
/// none was given. Non-payable operations refuse a fee.
fn attached_value(descriptor: &OperationDescriptor, fee: Option<&str>) -> Result<Option<U256>> {
    match (descriptor.mutability, fee) {
        (Mutability::Payable, Some(fee)) => parse_uint(fee.trim(), 256)
            .map(Some)
            .map_err(|e| ConsoleError::encoding_failure(format!("fee: {}", e))),
        (Mutability::Payable, None) => Ok(Some(U256::ZERO)),
        (_, None) => Ok(None),
        (_, Some(_)) => Err(ConsoleError::encoding_failure(format!(
            "{} is not payable and cannot take a fee",
            descriptor.signature()
        ))),
    }
}
