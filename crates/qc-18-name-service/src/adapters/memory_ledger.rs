//! In-memory ledger adapter.
//!
//! Implements [`LedgerGateway`] over an [`AliasRegistry`]. Every write runs
//! inside a single write-lock critical section, which makes the lock the
//! serialization point: uniqueness checks and commits are atomic with
//! respect to each other.

use crate::config::RegistryConfig;
use crate::domain::{
    recover_address, Address, AliasError, AliasRegistry, AliasStatus, Application,
    BroadcastTransaction, Hash, Receipt, RoleAuthorities, SignedCreateAlias, SignerRole,
};
use crate::ports::outbound::{LedgerGateway, SystemTimeSource, TimeSource};
use async_trait::async_trait;
use parking_lot::RwLock;
use quantum_telemetry::{log_alias_event, subsystem_span};
use std::collections::HashMap;

const SUBSYSTEM: &str = "qc-18";

#[derive(Debug)]
struct LedgerState {
    registry: AliasRegistry,
    /// Transactions sent per account.
    nonces: HashMap<Address, u64>,
    /// Receipts issued so far.
    sequence: u64,
}

impl LedgerState {
    /// Account for a handled transaction and build its receipt.
    fn receipt(
        &mut self,
        sender: Address,
        tx_hash: Hash,
        name: &str,
        outcome: Result<(), AliasError>,
    ) -> Result<Receipt, AliasError> {
        match outcome {
            Err(e) if !e.is_state_rejection() => Err(e),
            outcome => {
                self.sequence += 1;
                *self.nonces.entry(sender).or_insert(0) += 1;
                Ok(match outcome {
                    Ok(()) => Receipt::success(tx_hash, self.sequence, name),
                    Err(e) => Receipt::failed(tx_hash, self.sequence, name, &e),
                })
            }
        }
    }
}

/// In-memory ledger for tests and single-process deployments.
pub struct InMemoryLedger<T: TimeSource = SystemTimeSource> {
    state: RwLock<LedgerState>,
    authorities: RoleAuthorities,
    time_source: T,
}

impl InMemoryLedger<SystemTimeSource> {
    /// Ledger on the system clock.
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_time_source(config, SystemTimeSource)
    }
}

impl<T: TimeSource> InMemoryLedger<T> {
    /// Ledger on a custom clock.
    pub fn with_time_source(config: RegistryConfig, time_source: T) -> Self {
        Self {
            state: RwLock::new(LedgerState {
                registry: AliasRegistry::new(config.fee_validator(), config.max_name_length),
                nonces: HashMap::new(),
                sequence: 0,
            }),
            authorities: config.authorities,
            time_source,
        }
    }

    /// Read-only access to the registry.
    pub fn with_registry<R>(&self, f: impl FnOnce(&AliasRegistry) -> R) -> R {
        f(&self.state.read().registry)
    }

    /// Receipts issued so far.
    pub fn sequence(&self) -> u64 {
        self.state.read().sequence
    }

    fn verify_broadcast(&self, tx: &BroadcastTransaction) -> Result<(), AliasError> {
        let sender = recover_address(&tx.digest(), &tx.signature)?;
        if sender != tx.sender {
            return Err(AliasError::InvalidSignature(format!(
                "broadcast signature recovers to {}, claimed {}",
                sender, tx.sender
            )));
        }
        if sender != self.authorities.middleware {
            return Err(AliasError::UnauthorizedSigner {
                role: SignerRole::Middleware,
                expected: self.authorities.middleware,
                actual: sender,
            });
        }
        tx.tx.verify_signatures(&self.authorities)
    }
}

#[async_trait]
impl<T: TimeSource> LedgerGateway for InMemoryLedger<T> {
    async fn submit_application(&self, tx: SignedCreateAlias) -> Result<Receipt, AliasError> {
        let applicant = tx.verify_applicant()?;
        let tx_hash = tx.tx_hash();
        let request = &tx.request;
        let now = self.time_source.now();

        let mut state = self.state.write();
        let outcome =
            state
                .registry
                .create_application(&request.name, applicant, &request.fee, now);

        if let Err(e) = &outcome {
            if e.is_state_rejection() {
                log_alias_event!(
                    debug,
                    SUBSYSTEM,
                    "Application refused",
                    request.name,
                    applicant = %applicant,
                    code = %e.code()
                );
            }
        } else {
            log_alias_event!(
                info,
                SUBSYSTEM,
                "Application recorded",
                request.name,
                applicant = %applicant
            );
        }

        state.receipt(applicant, tx_hash, &request.name, outcome.map(|_| ()))
    }

    async fn submit_status(&self, tx: BroadcastTransaction) -> Result<Receipt, AliasError> {
        let _span = subsystem_span!("submit_status", subsystem = SUBSYSTEM, alias = %tx.name())
            .entered();
        self.verify_broadcast(&tx)?;
        let tx_hash = tx.tx_hash();
        let payload = tx.tx.payload();

        let mut state = self.state.write();
        let outcome = state.registry.commit_status(payload);

        match &outcome {
            Ok(commit) => {
                log_alias_event!(
                    info,
                    SUBSYSTEM,
                    "Status committed",
                    commit.name,
                    applicant = %commit.applicant,
                    approved = (commit.status == AliasStatus::Approved)
                );
                if let Some(released) = &commit.released {
                    log_alias_event!(info, SUBSYSTEM, "Alias released", released);
                }
            }
            Err(e) => {
                log_alias_event!(
                    debug,
                    SUBSYSTEM,
                    "Status refused",
                    payload.name,
                    code = %e.code()
                );
            }
        }

        let result = state.receipt(tx.sender, tx_hash, &payload.name, outcome.map(|_| ()));
        debug_assert_eq!(state.registry.verify_consistency(), Ok(()));
        result
    }

    async fn pending_application(
        &self,
        applicant: Address,
    ) -> Result<Option<Application>, AliasError> {
        Ok(self
            .state
            .read()
            .registry
            .pending_application(&applicant)
            .cloned())
    }

    async fn pending_application_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Application>, AliasError> {
        let state = self.state.read();
        let name = state.registry.normalize(name)?;
        Ok(state.registry.pending_by_name(&name).cloned())
    }

    async fn resolve_name(&self, name: &str) -> Result<Address, AliasError> {
        self.state.read().registry.resolve_name(name)
    }

    async fn lookup_address(&self, address: Address) -> Result<String, AliasError> {
        self.state.read().registry.lookup_address(&address)
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, AliasError> {
        Ok(self
            .state
            .read()
            .nonces
            .get(&address)
            .copied()
            .unwrap_or(0))
    }
}
