//! # Domain Entities
//!
//! Core data structures for alias registration and resolution.

use super::errors::{AliasError, ErrorCode};
use super::signing::{hash_parts, hex_hash};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub use primitive_types::U256;

/// A 32-byte keccak256 hash.
pub type Hash = [u8; 32];

/// Timestamp in milliseconds since UNIX epoch.
pub type Timestamp = u64;

// =============================================================================
// ADDRESS
// =============================================================================

/// 20-byte ledger address (last 20 bytes of keccak256(pubkey)).
///
/// Renders and parses as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AliasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let bytes = hex::decode(digits).map_err(|_| AliasError::MalformedAddress(s.to_string()))?;
        let array: [u8; 20] = bytes
            .try_into()
            .map_err(|_| AliasError::MalformedAddress(s.to_string()))?;
        Ok(Self(array))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// ALIAS
// =============================================================================

/// Lifecycle status of an alias name.
///
/// ```text
/// None ──create──→ Pending ──approve──→ Approved
///                     │
///                     └──reject──→ None (name released)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasStatus {
    /// No alias record; the name is available.
    #[default]
    None,
    /// An application is waiting for a status transaction.
    Pending,
    /// Committed binding, visible to the resolver.
    Approved,
    /// Reported by a reject commit; never stored.
    Rejected,
}

/// An alias record as held by the registry.
///
/// INVARIANT: at most one `Approved` alias per owner.
/// INVARIANT: `name` unique among `Pending` and `Approved` aliases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    /// Normalized alias name.
    pub name: String,
    /// Applicant while pending; owner once approved.
    pub owner: Address,
    /// Current status.
    pub status: AliasStatus,
}

// =============================================================================
// FEES
// =============================================================================

/// Fee descriptor as it arrives on the wire: `{ "to": "0x…", "value": "100000000" }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeDescriptor {
    /// Fee collector address.
    pub to: Address,
    /// Unsigned integer amount as a decimal string.
    pub value: String,
}

impl FeeDescriptor {
    /// Build a descriptor from an amount.
    pub fn new(to: Address, value: impl Into<U256>) -> Self {
        Self {
            to,
            value: value.into().to_string(),
        }
    }
}

/// Parsed application fee. Immutable once attached to an [`Application`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRecord {
    /// Fee collector address.
    pub collector: Address,
    /// Amount paid.
    pub amount: U256,
}

// =============================================================================
// APPLICATION
// =============================================================================

/// A pending alias request.
///
/// Exists only while the alias is `Pending`; at most one per applicant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Requested alias name (normalized).
    pub name: String,
    /// Applicant address.
    pub applicant: Address,
    /// Fee attached at intake.
    pub fee: FeeRecord,
    /// Ledger timestamp at intake (ms).
    pub created_at: Timestamp,
    /// Registry-assigned intake number, never reused.
    pub serial: u64,
}

impl Application {
    /// Identifier binding a status transaction to this exact application.
    ///
    /// A later application for the same name (after a reject) has a
    /// different serial, so an old status transaction cannot finalize it
    /// even when both share a timestamp.
    pub fn id(&self) -> Hash {
        let mut amount = [0u8; 32];
        self.fee.amount.to_big_endian(&mut amount);
        hash_parts(&[
            b"qc-18/application",
            self.name.as_bytes(),
            self.applicant.as_bytes(),
            self.fee.collector.as_bytes(),
            &amount,
            &self.created_at.to_be_bytes(),
            &self.serial.to_be_bytes(),
        ])
    }
}

// =============================================================================
// RECEIPTS & OVERRIDES
// =============================================================================

/// Receipt status: `1` on a state-changing commit, `0` otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ReceiptStatus {
    /// Transaction was handled but changed nothing.
    Failed = 0,
    /// Transaction committed.
    Success = 1,
}

/// Ledger receipt for a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Commit status.
    pub status: ReceiptStatus,
    /// Hash of the submitted transaction.
    #[serde(with = "hex_hash")]
    pub tx_hash: Hash,
    /// Ledger sequence number assigned to the transaction.
    pub sequence: u64,
    /// Alias the transaction referenced.
    pub name: String,
    /// Paired error code when `status` is `Failed`.
    pub error: Option<ErrorCode>,
    /// Human-readable reason when `status` is `Failed`.
    pub reason: Option<String>,
}

impl Receipt {
    /// Receipt for a committed transaction.
    pub fn success(tx_hash: Hash, sequence: u64, name: impl Into<String>) -> Self {
        Self {
            status: ReceiptStatus::Success,
            tx_hash,
            sequence,
            name: name.into(),
            error: None,
            reason: None,
        }
    }

    /// Receipt for a transaction the ledger handled but refused.
    pub fn failed(tx_hash: Hash, sequence: u64, name: impl Into<String>, error: &AliasError) -> Self {
        Self {
            status: ReceiptStatus::Failed,
            tx_hash,
            sequence,
            name: name.into(),
            error: Some(error.code()),
            reason: Some(error.to_string()),
        }
    }

    /// `1` or `0`.
    pub fn status_code(&self) -> u8 {
        self.status as u8
    }

    /// Whether the transaction committed.
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }

    /// Convert a failed receipt into its paired error.
    pub fn into_result(self) -> Result<Receipt, AliasError> {
        match self.status {
            ReceiptStatus::Success => Ok(self),
            ReceiptStatus::Failed => Err(AliasError::Rejected {
                code: self.error.unwrap_or(ErrorCode::LedgerError),
                reason: self.reason.unwrap_or_default(),
            }),
        }
    }
}

/// Per-call transaction overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overrides {
    /// Explicit account nonce; fetched from the ledger when absent.
    pub nonce: Option<u64>,
    /// Free-form memo included in the signed envelope.
    pub memo: Option<String>,
}
