//! # Inbound Ports
//!
//! The public Name Service API.

use super::outbound::AliasSigner;
use crate::domain::{
    Address, AliasError, Application, FeeDescriptor, FullySigned, Overrides, ProviderSigned,
    Receipt, StatusTransaction,
};
use async_trait::async_trait;

/// Name Service API - inbound port.
///
/// Signers are passed per call; the service holds no keys.
#[async_trait]
pub trait NameServiceApi: Send + Sync {
    /// File an application for `name`, signed by `applicant`.
    ///
    /// `status = 0` receipts carry `EXISTS` or `NOT_ALLOWED` for duplicates.
    async fn create_alias(
        &self,
        applicant: &dyn AliasSigner,
        name: &str,
        fee: FeeDescriptor,
        overrides: Overrides,
    ) -> Result<Receipt, AliasError>;

    /// Pending application of `owner`, if any.
    async fn get_pending_alias(&self, owner: Address) -> Result<Option<Application>, AliasError>;

    /// Build and provider-sign an approve transaction.
    async fn approve_alias(
        &self,
        name: &str,
        provider: &dyn AliasSigner,
    ) -> Result<StatusTransaction<ProviderSigned>, AliasError>;

    /// Build and provider-sign a reject transaction.
    async fn reject_alias(
        &self,
        name: &str,
        provider: &dyn AliasSigner,
    ) -> Result<StatusTransaction<ProviderSigned>, AliasError>;

    /// Issuer co-signs.
    async fn sign_alias_status_transaction(
        &self,
        tx: StatusTransaction<ProviderSigned>,
        issuer: &dyn AliasSigner,
    ) -> Result<StatusTransaction<FullySigned>, AliasError>;

    /// Middleware broadcasts.
    async fn send_alias_status_transaction(
        &self,
        tx: StatusTransaction<FullySigned>,
        middleware: &dyn AliasSigner,
        overrides: Overrides,
    ) -> Result<Receipt, AliasError>;

    /// Forward lookup; `INVALID_ADDRESS` unless approved.
    async fn resolve_name(&self, name: &str) -> Result<Address, AliasError>;

    /// Reverse lookup; `NOT_ALLOWED` after a reject cycle, `NOT_FOUND` otherwise.
    async fn lookup_address(&self, address: Address) -> Result<String, AliasError>;
}
