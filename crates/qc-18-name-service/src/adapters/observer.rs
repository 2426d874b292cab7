//! Observer adapters.
//!
//! - [`TracingObserver`]: debug-level `tracing` events, gated by [`TraceConfig`]
//! - [`NoopObserver`]: ignores everything
//! - [`RecordingObserver`]: keeps every event in memory for assertions

use crate::domain::{Hash, SignerRole};
use crate::ports::outbound::{AliasObserver, LedgerRequest, LedgerResponse};
use parking_lot::Mutex;
use quantum_telemetry::{log_alias_event, log_event, TraceConfig};

const SUBSYSTEM: &str = "qc-18";

/// Writes signing and RPC traffic to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver {
    trace: TraceConfig,
}

impl TracingObserver {
    /// Observer honoring `trace`.
    pub fn new(trace: TraceConfig) -> Self {
        Self { trace }
    }
}

impl AliasObserver for TracingObserver {
    fn on_signature_payload(&self, role: SignerRole, name: &str, digest: &Hash) {
        if self.trace.rpc_enabled() {
            log_alias_event!(
                debug,
                SUBSYSTEM,
                "Signature payload",
                name,
                role = %role,
                digest = %hex::encode(digest)
            );
        }
    }

    fn on_signed_transaction(&self, role: SignerRole, name: &str, tx_hash: &Hash) {
        if self.trace.lifecycle_enabled() {
            log_alias_event!(
                debug,
                SUBSYSTEM,
                "Signed transaction",
                name,
                role = %role,
                tx_hash = %hex::encode(tx_hash)
            );
        }
    }

    fn on_request(&self, request: &LedgerRequest) {
        if self.trace.rpc_enabled() {
            log_event!(
                debug,
                SUBSYSTEM,
                "Ledger request",
                id = %request.id,
                method = %request.method,
                params = %request.params
            );
        }
    }

    fn on_response(&self, response: &LedgerResponse) {
        if self.trace.rpc_enabled() {
            log_event!(
                debug,
                SUBSYSTEM,
                "Ledger response",
                request_id = %response.request_id,
                ok = response.ok,
                body = %response.body
            );
        }
    }
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AliasObserver for NoopObserver {}

/// One observed event.
#[derive(Debug, Clone)]
pub enum ObservedEvent {
    /// Digest about to be signed.
    SignaturePayload {
        /// Signing role
        role: SignerRole,
        /// Alias name
        name: String,
        /// Digest
        digest: Hash,
    },
    /// Transaction signed.
    SignedTransaction {
        /// Signing role
        role: SignerRole,
        /// Alias name
        name: String,
        /// Transaction hash
        tx_hash: Hash,
    },
    /// Ledger request.
    Request(LedgerRequest),
    /// Ledger response.
    Response(LedgerResponse),
}

/// Records events in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().clone()
    }

    /// Roles that signed, in order.
    pub fn signing_roles(&self) -> Vec<SignerRole> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::SignedTransaction { role, .. } => Some(*role),
                _ => None,
            })
            .collect()
    }

    /// Ledger methods called, in order.
    pub fn methods(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Request(r) => Some(r.method.clone()),
                _ => None,
            })
            .collect()
    }
}

impl AliasObserver for RecordingObserver {
    fn on_signature_payload(&self, role: SignerRole, name: &str, digest: &Hash) {
        self.events.lock().push(ObservedEvent::SignaturePayload {
            role,
            name: name.to_string(),
            digest: *digest,
        });
    }

    fn on_signed_transaction(&self, role: SignerRole, name: &str, tx_hash: &Hash) {
        self.events.lock().push(ObservedEvent::SignedTransaction {
            role,
            name: name.to_string(),
            tx_hash: *tx_hash,
        });
    }

    fn on_request(&self, request: &LedgerRequest) {
        self.events
            .lock()
            .push(ObservedEvent::Request(request.clone()));
    }

    fn on_response(&self, response: &LedgerResponse) {
        self.events
            .lock()
            .push(ObservedEvent::Response(response.clone()));
    }
}
