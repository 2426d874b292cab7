//! # Domain Errors
//!
//! Error types for the Name Service.
//!
//! Every failure is a typed, recoverable value. Callers match on
//! [`AliasError::code`] to decide whether a failure is a benign duplicate
//! (safe to ignore) or a genuine problem.

use super::entities::Address;
use super::status_tx::{SignerRole, SigningStage};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable error code carried by receipts and surfaced to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Name already has a pending or approved alias.
    Exists,
    /// Blocked by policy (duplicate pending application, restricted lookup).
    NotAllowed,
    /// Referenced application is not pending, or address has no alias.
    NotFound,
    /// Name does not resolve, or an address could not be parsed.
    InvalidAddress,
    /// Role signed at the wrong stage.
    InvalidSignatureOrder,
    /// Transaction broadcast before both signatures were attached.
    IncompleteSignatures,
    /// Fee descriptor rejected.
    InvalidFee,
    /// Alias name rejected.
    InvalidName,
    /// Signature malformed or unrecoverable.
    InvalidSignature,
    /// Signature recovered to an address that does not hold the role.
    Unauthorized,
    /// Signing key could not be loaded.
    InvalidKey,
    /// Ledger transport or internal failure.
    LedgerError,
}

impl ErrorCode {
    /// Wire name of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exists => "EXISTS",
            Self::NotAllowed => "NOT_ALLOWED",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidAddress => "INVALID_ADDRESS",
            Self::InvalidSignatureOrder => "INVALID_SIGNATURE_ORDER",
            Self::IncompleteSignatures => "INCOMPLETE_SIGNATURES",
            Self::InvalidFee => "INVALID_FEE",
            Self::InvalidName => "INVALID_NAME",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidKey => "INVALID_KEY",
            Self::LedgerError => "LEDGER_ERROR",
        }
    }

    /// Failures a resubmitting caller may safely ignore: the ledger already
    /// holds (or has already finalized) the state the caller asked for.
    pub fn is_benign_duplicate(&self) -> bool {
        matches!(self, Self::Exists | Self::NotAllowed | Self::NotFound)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name Service error type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AliasError {
    /// Name already has a pending or approved alias.
    #[error("Alias already exists: {0}")]
    AliasExists(String),

    /// Applicant already has a pending application.
    #[error("Applicant {0} already has a pending application")]
    PendingApplicationExists(Address),

    /// Reverse lookup is restricted for this address.
    #[error("Reverse lookup not allowed for {0}")]
    LookupNotAllowed(Address),

    /// No pending application matches the status transaction.
    #[error("No pending application for alias: {0}")]
    ApplicationNotFound(String),

    /// Address owns no approved alias.
    #[error("No alias registered for {0}")]
    AddressNotFound(Address),

    /// Name has no approved alias.
    #[error("Alias does not resolve: {0}")]
    UnresolvedName(String),

    /// Address string could not be parsed.
    #[error("Malformed address: {0}")]
    MalformedAddress(String),

    /// Role/stage combination violates the signing order.
    #[error("Invalid signature order: {role} cannot sign at stage {stage}")]
    InvalidSignatureOrder {
        /// Role that attempted to sign
        role: SignerRole,
        /// Stage the transaction was in
        stage: SigningStage,
    },

    /// Transaction has not collected every required signature.
    #[error("Incomplete signatures: transaction is at stage {0}")]
    IncompleteSignatures(SigningStage),

    /// Fee descriptor rejected.
    #[error("Invalid fee: {0}")]
    InvalidFee(String),

    /// Alias name rejected.
    #[error("Invalid alias name {name:?}: {reason}")]
    InvalidName {
        /// Name as submitted
        name: String,
        /// Rule that was violated
        reason: String,
    },

    /// Signature malformed or unrecoverable.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Signature recovered to an address that does not hold the role.
    #[error("Unauthorized {role} signer: expected {expected}, got {actual}")]
    UnauthorizedSigner {
        /// Role being checked
        role: SignerRole,
        /// Address that holds the role
        expected: Address,
        /// Address that actually signed
        actual: Address,
    },

    /// Private key material rejected.
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    /// Ledger refused a transaction and reported it in a failed receipt.
    #[error("Transaction rejected ({code}): {reason}")]
    Rejected {
        /// Code from the receipt
        code: ErrorCode,
        /// Ledger-supplied reason
        reason: String,
    },

    /// Ledger transport or internal failure.
    #[error("Ledger error: {0}")]
    Ledger(String),
}

impl AliasError {
    /// Project the error onto its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AliasExists(_) => ErrorCode::Exists,
            Self::PendingApplicationExists(_) | Self::LookupNotAllowed(_) => ErrorCode::NotAllowed,
            Self::ApplicationNotFound(_) | Self::AddressNotFound(_) => ErrorCode::NotFound,
            Self::UnresolvedName(_) | Self::MalformedAddress(_) => ErrorCode::InvalidAddress,
            Self::InvalidSignatureOrder { .. } => ErrorCode::InvalidSignatureOrder,
            Self::IncompleteSignatures(_) => ErrorCode::IncompleteSignatures,
            Self::InvalidFee(_) => ErrorCode::InvalidFee,
            Self::InvalidName { .. } => ErrorCode::InvalidName,
            Self::InvalidSignature(_) => ErrorCode::InvalidSignature,
            Self::UnauthorizedSigner { .. } => ErrorCode::Unauthorized,
            Self::InvalidKey(_) => ErrorCode::InvalidKey,
            Self::Rejected { code, .. } => *code,
            Self::Ledger(_) => ErrorCode::LedgerError,
        }
    }

    /// Whether the ledger reports this as a failed receipt instead of an error.
    ///
    /// These are the state conflicts a correctly signed transaction can still
    /// run into once it reaches the serialization point.
    pub fn is_state_rejection(&self) -> bool {
        matches!(
            self,
            Self::AliasExists(_) | Self::PendingApplicationExists(_) | Self::ApplicationNotFound(_)
        )
    }
}
