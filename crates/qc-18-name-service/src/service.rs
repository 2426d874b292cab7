//! # Name Service
//!
//! Client-side driver of the alias protocol.
//!
//! ## Architecture
//!
//! Implements the inbound [`NameServiceApi`] port on top of two outbound
//! ports:
//! - [`LedgerGateway`]: commits and reads alias state
//! - [`AliasObserver`]: sees signing payloads and ledger traffic
//!
//! Signers are supplied per call, so one service instance can drive every
//! role of the protocol.
//!
//! ## Flow
//!
//! ```text
//! create_alias ──→ ledger (Pending)
//! approve_alias / reject_alias ──→ StatusTransaction<ProviderSigned>
//! sign_alias_status_transaction ──→ StatusTransaction<FullySigned>
//! send_alias_status_transaction ──→ ledger (commit or NOT_FOUND receipt)
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use quantum_telemetry::log_alias_event;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::adapters::observer::TracingObserver;
use crate::config::NameServiceConfig;
use crate::domain::{
    normalize_alias_name, Address, AliasError, Application, BroadcastTransaction,
    CreateAliasRequest, FeeDescriptor, FullySigned, Overrides, ProviderSigned, Receipt,
    SignedCreateAlias, SignerRole, StatusAction, StatusPayload, StatusTransaction,
    StatusTransactionEnvelope, Unsigned,
};
use crate::ports::inbound::NameServiceApi;
use crate::ports::outbound::{
    AliasObserver, AliasSigner, LedgerGateway, LedgerRequest, LedgerResponse,
};

const SUBSYSTEM: &str = "qc-18";

/// Name Service.
///
/// Thread-safe; share across tasks via `Arc`.
pub struct NameService<L, O = TracingObserver>
where
    L: LedgerGateway,
    O: AliasObserver,
{
    ledger: Arc<L>,
    observer: O,
    config: NameServiceConfig,
}

impl<L: LedgerGateway> NameService<L, TracingObserver> {
    /// Service logging through `tracing`, gated by `config.trace`.
    pub fn new(ledger: Arc<L>, config: NameServiceConfig) -> Self {
        let observer = TracingObserver::new(config.trace);
        Self::with_observer(ledger, observer, config)
    }
}

impl<L, O> NameService<L, O>
where
    L: LedgerGateway,
    O: AliasObserver,
{
    /// Service with a custom observer.
    pub fn with_observer(ledger: Arc<L>, observer: O, config: NameServiceConfig) -> Self {
        Self {
            ledger,
            observer,
            config,
        }
    }

    /// The observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// The ledger.
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Wrap a ledger call with the observer's request/response hooks.
    async fn call<R, F>(
        &self,
        method: &str,
        params: serde_json::Value,
        fut: F,
    ) -> Result<R, AliasError>
    where
        R: Serialize + Send,
        F: Future<Output = Result<R, AliasError>> + Send,
    {
        let request = LedgerRequest {
            id: Uuid::new_v4(),
            method: method.to_string(),
            params,
        };
        self.observer.on_request(&request);

        let result = fut.await;

        let response = match &result {
            Ok(value) => LedgerResponse {
                request_id: request.id,
                ok: true,
                body: serde_json::to_value(value).unwrap_or_default(),
            },
            Err(e) => LedgerResponse {
                request_id: request.id,
                ok: false,
                body: json!({ "code": e.code(), "message": e.to_string() }),
            },
        };
        self.observer.on_response(&response);

        result
    }

    async fn next_nonce(&self, address: Address, overrides: &Overrides) -> Result<u64, AliasError> {
        match overrides.nonce {
            Some(nonce) => Ok(nonce),
            None => {
                self.call(
                    "transaction_count",
                    json!({ "address": address }),
                    self.ledger.transaction_count(address),
                )
                .await
            }
        }
    }

    fn log_receipt(&self, receipt: &Receipt) {
        if self.config.trace.lifecycle_enabled() {
            log_alias_event!(
                info,
                SUBSYSTEM,
                "Receipt",
                receipt.name,
                status = receipt.status_code(),
                sequence = receipt.sequence,
                error = ?receipt.error
            );
        }
    }

    /// Build an unsigned status transaction for the pending application of `name`.
    ///
    /// Fails with `NOT_FOUND` when no application is pending.
    pub async fn build_status_transaction(
        &self,
        name: &str,
        action: StatusAction,
        initiator: Address,
    ) -> Result<StatusTransaction<Unsigned>, AliasError> {
        let name = normalize_alias_name(name, self.config.max_name_length)?;
        let application = self
            .call(
                "pending_application_by_name",
                json!({ "name": name }),
                self.ledger.pending_application_by_name(&name),
            )
            .await?
            .ok_or_else(|| AliasError::ApplicationNotFound(name.clone()))?;

        Ok(StatusTransaction::new(StatusPayload {
            name: application.name.clone(),
            action,
            applicant: application.applicant,
            application_id: application.id(),
            initiator,
        }))
    }

    async fn initiate(
        &self,
        name: &str,
        action: StatusAction,
        provider: &dyn AliasSigner,
    ) -> Result<StatusTransaction<ProviderSigned>, AliasError> {
        let tx = self
            .build_status_transaction(name, action, provider.address())
            .await?;

        self.observer
            .on_signature_payload(SignerRole::Provider, tx.name(), &tx.signing_digest());
        let tx = tx.sign(provider).await?;
        self.observer
            .on_signed_transaction(SignerRole::Provider, tx.name(), &tx.signing_digest());
        Ok(tx)
    }

    /// Broadcast a fully-signed envelope received from another process.
    ///
    /// Fails with `INCOMPLETE_SIGNATURES` if the issuer has not signed yet.
    pub async fn send_alias_status_envelope(
        &self,
        envelope: StatusTransactionEnvelope,
        middleware: &dyn AliasSigner,
        overrides: Overrides,
    ) -> Result<Receipt, AliasError> {
        let tx = StatusTransaction::<FullySigned>::try_from(envelope)?;
        self.send_alias_status_transaction(tx, middleware, overrides)
            .await
    }
}

#[async_trait]
impl<L, O> NameServiceApi for NameService<L, O>
where
    L: LedgerGateway,
    O: AliasObserver,
{
    async fn create_alias(
        &self,
        applicant: &dyn AliasSigner,
        name: &str,
        fee: FeeDescriptor,
        overrides: Overrides,
    ) -> Result<Receipt, AliasError> {
        let name = normalize_alias_name(name, self.config.max_name_length)?;
        self.config.fee_validator().validate_descriptor(&fee)?;

        let address = applicant.address();
        let nonce = self.next_nonce(address, &overrides).await?;
        let request = CreateAliasRequest {
            name,
            applicant: address,
            fee,
            nonce,
            memo: overrides.memo,
        };

        let digest = request.signing_digest();
        self.observer
            .on_signature_payload(SignerRole::Applicant, &request.name, &digest);
        let signature = applicant.sign_digest(&digest).await?;
        let tx = SignedCreateAlias { request, signature };
        self.observer
            .on_signed_transaction(SignerRole::Applicant, &tx.request.name, &tx.tx_hash());

        let params = serde_json::to_value(&tx).unwrap_or_default();
        let receipt = self
            .call("submit_application", params, self.ledger.submit_application(tx))
            .await?;
        self.log_receipt(&receipt);
        Ok(receipt)
    }

    async fn get_pending_alias(&self, owner: Address) -> Result<Option<Application>, AliasError> {
        self.call(
            "pending_application",
            json!({ "applicant": owner }),
            self.ledger.pending_application(owner),
        )
        .await
    }

    async fn approve_alias(
        &self,
        name: &str,
        provider: &dyn AliasSigner,
    ) -> Result<StatusTransaction<ProviderSigned>, AliasError> {
        self.initiate(name, StatusAction::Approve, provider).await
    }

    async fn reject_alias(
        &self,
        name: &str,
        provider: &dyn AliasSigner,
    ) -> Result<StatusTransaction<ProviderSigned>, AliasError> {
        self.initiate(name, StatusAction::Reject, provider).await
    }

    async fn sign_alias_status_transaction(
        &self,
        tx: StatusTransaction<ProviderSigned>,
        issuer: &dyn AliasSigner,
    ) -> Result<StatusTransaction<FullySigned>, AliasError> {
        self.observer
            .on_signature_payload(SignerRole::Issuer, tx.name(), &tx.signing_digest());
        let tx = tx.sign(issuer).await?;
        self.observer
            .on_signed_transaction(SignerRole::Issuer, tx.name(), &tx.signing_digest());
        Ok(tx)
    }

    async fn send_alias_status_transaction(
        &self,
        tx: StatusTransaction<FullySigned>,
        middleware: &dyn AliasSigner,
        overrides: Overrides,
    ) -> Result<Receipt, AliasError> {
        let sender = middleware.address();
        let nonce = self.next_nonce(sender, &overrides).await?;
        let memo = overrides.memo;

        let digest = BroadcastTransaction::digest_for(&tx, sender, nonce, memo.as_deref());
        self.observer
            .on_signature_payload(SignerRole::Middleware, tx.name(), &digest);
        let signature = middleware.sign_digest(&digest).await?;

        let broadcast = BroadcastTransaction {
            tx: tx.into_submitted(),
            sender,
            nonce,
            memo,
            signature,
        };
        let tx_hash = broadcast.tx_hash();
        self.observer
            .on_signed_transaction(SignerRole::Middleware, broadcast.name(), &tx_hash);

        let params = json!({
            "name": broadcast.name(),
            "action": broadcast.tx.action(),
            "sender": sender,
            "nonce": nonce,
            "tx_hash": format!("0x{}", hex::encode(tx_hash)),
        });
        let receipt = self
            .call("submit_status", params, self.ledger.submit_status(broadcast))
            .await?;
        self.log_receipt(&receipt);
        Ok(receipt)
    }

    async fn resolve_name(&self, name: &str) -> Result<Address, AliasError> {
        self.call(
            "resolve_name",
            json!({ "name": name }),
            self.ledger.resolve_name(name),
        )
        .await
    }

    async fn lookup_address(&self, address: Address) -> Result<String, AliasError> {
        self.call(
            "lookup_address",
            json!({ "address": address }),
            self.ledger.lookup_address(address),
        )
        .await
    }
}
