//! # Outbound Ports
//!
//! Traits for external collaborators: the ledger, wallets, observers and
//! the clock.

use crate::domain::{
    Address, AliasError, Application, BroadcastTransaction, EcdsaSignature, Hash, Receipt,
    SignedCreateAlias, SignerRole, Timestamp,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ledger commit/read channel.
///
/// Delivery is at-least-once: a submission may reach the ledger more than
/// once. The registry's idempotence rules turn repeats into `status = 0`
/// receipts.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Submit a signed create-alias request.
    async fn submit_application(&self, tx: SignedCreateAlias) -> Result<Receipt, AliasError>;

    /// Submit a fully-signed, broadcast-wrapped status transaction.
    async fn submit_status(&self, tx: BroadcastTransaction) -> Result<Receipt, AliasError>;

    /// Pending application of `applicant`.
    async fn pending_application(
        &self,
        applicant: Address,
    ) -> Result<Option<Application>, AliasError>;

    /// Pending application for a normalized name.
    async fn pending_application_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Application>, AliasError>;

    /// Forward lookup.
    async fn resolve_name(&self, name: &str) -> Result<Address, AliasError>;

    /// Reverse lookup.
    async fn lookup_address(&self, address: Address) -> Result<String, AliasError>;

    /// Transactions sent so far by `address`; the next nonce.
    async fn transaction_count(&self, address: Address) -> Result<u64, AliasError>;
}

/// Wallet/identity collaborator.
#[async_trait]
pub trait AliasSigner: Send + Sync {
    /// Address of the signing key.
    fn address(&self) -> Address;

    /// Sign a 32-byte digest.
    async fn sign_digest(&self, digest: &Hash) -> Result<EcdsaSignature, AliasError>;
}

/// Outgoing ledger call, as seen by an [`AliasObserver`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerRequest {
    /// Correlates request and response.
    pub id: Uuid,
    /// Ledger method name.
    pub method: String,
    /// Call parameters.
    pub params: serde_json::Value,
}

/// Ledger reply, as seen by an [`AliasObserver`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerResponse {
    /// Id of the originating request.
    pub request_id: Uuid,
    /// Whether the call returned `Ok`.
    pub ok: bool,
    /// Result value or error message.
    pub body: serde_json::Value,
}

/// Hooks for signing and ledger traffic. Every method defaults to a no-op.
pub trait AliasObserver: Send + Sync {
    /// A digest is about to be signed.
    fn on_signature_payload(&self, _role: SignerRole, _name: &str, _digest: &Hash) {}

    /// A transaction has been signed.
    fn on_signed_transaction(&self, _role: SignerRole, _name: &str, _tx_hash: &Hash) {}

    /// A ledger call is about to be made.
    fn on_request(&self, _request: &LedgerRequest) {}

    /// A ledger call returned.
    fn on_response(&self, _response: &LedgerResponse) {}
}

/// Time source abstraction for testability.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Settable clock for tests.
#[cfg(test)]
pub struct MockTimeSource {
    time: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: std::sync::atomic::AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.time
            .fetch_add(ms, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(std::sync::atomic::Ordering::SeqCst)
    }
}
