//! # Type-State Status Transactions
//!
//! An approve/reject decision on a pending application must collect two
//! ordered signatures before the middleware may broadcast it:
//!
//! ```text
//! [Unsigned] ──provider──→ [ProviderSigned] ──issuer──→ [FullySigned] ──middleware──→ [Submitted]
//! ```
//!
//! Each stage is a distinct type. A transition consumes `self`, so signing
//! out of order or broadcasting a half-signed transaction does not compile:
//!
//! ```ignore
//! let tx: StatusTransaction<Unsigned> = StatusTransaction::new(payload);
//! let tx = tx.sign(&provider).await?;        // ProviderSigned
//! let tx = tx.sign(&issuer).await?;          // FullySigned
//! // tx.sign(&issuer)                        // COMPILE ERROR: no such method
//! ```
//!
//! Transactions that leave the process travel as a
//! [`StatusTransactionEnvelope`], which carries its stage at runtime. The
//! ordering rules are re-checked when an envelope is signed or converted back
//! into a typed transaction.
//!
//! ## Signature chaining
//!
//! Every signature covers the payload plus all signatures already attached:
//!
//! ```text
//! d0 = keccak("qc-18/status" ‖ payload)          provider signs d0
//! d1 = keccak(d0 ‖ provider_sig)                 issuer signs d1
//! d2 = keccak(d1 ‖ issuer_sig)
//! broadcast = keccak("qc-18/broadcast" ‖ d2 ‖ sender ‖ nonce ‖ memo)
//! ```

use super::entities::{Address, Hash};
use super::errors::AliasError;
use super::signing::{hash_parts, hex_hash, recover_address, verify_signer, EcdsaSignature};
use crate::ports::outbound::AliasSigner;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

// =============================================================================
// ACTIONS, ROLES, STAGES
// =============================================================================

/// Decision carried by a status transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusAction {
    /// Grant the alias to the applicant.
    Approve,
    /// Discard the application and free the name.
    Reject,
}

impl StatusAction {
    fn tag(self) -> u8 {
        match self {
            Self::Approve => 1,
            Self::Reject => 2,
        }
    }
}

impl fmt::Display for StatusAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approve => f.write_str("approve"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// Parties that sign alias transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignerRole {
    /// Requests an alias.
    Applicant,
    /// Initiates approve/reject.
    Provider,
    /// Co-signs the provider's decision.
    Issuer,
    /// Broadcasts the fully-signed transaction.
    Middleware,
}

impl fmt::Display for SignerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Applicant => "applicant",
            Self::Provider => "provider",
            Self::Issuer => "issuer",
            Self::Middleware => "middleware",
        };
        f.write_str(s)
    }
}

/// Runtime view of a transaction's signing stage. Ordered by progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningStage {
    /// No signatures.
    Unsigned,
    /// Provider signature attached.
    ProviderSigned,
    /// Provider and issuer signatures attached.
    FullySigned,
    /// Handed to the ledger. Never mutated again.
    Submitted,
}

impl fmt::Display for SigningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unsigned => "unsigned",
            Self::ProviderSigned => "provider_signed",
            Self::FullySigned => "fully_signed",
            Self::Submitted => "submitted",
        };
        f.write_str(s)
    }
}

/// Addresses holding each signing role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAuthorities {
    /// Only address allowed to initiate status transactions.
    pub provider: Address,
    /// Only address allowed to co-sign.
    pub issuer: Address,
    /// Only address allowed to broadcast.
    pub middleware: Address,
}

// =============================================================================
// STATE MARKERS (Zero-Sized Types)
// =============================================================================

/// Marker: no signatures yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsigned;

/// Marker: provider has signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSigned;

/// Marker: provider and issuer have signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullySigned;

/// Marker: handed to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submitted;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Unsigned {}
    impl Sealed for super::ProviderSigned {}
    impl Sealed for super::FullySigned {}
    impl Sealed for super::Submitted {}
}

/// Compile-time signing stage.
pub trait Stage: sealed::Sealed + Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Runtime equivalent.
    const STAGE: SigningStage;
    /// Role that acts on a transaction in this stage.
    const ACTOR: SignerRole;
    /// Roles whose signatures are attached, in order.
    const SIGNED_BY: &'static [SignerRole];
}

impl Stage for Unsigned {
    const STAGE: SigningStage = SigningStage::Unsigned;
    const ACTOR: SignerRole = SignerRole::Provider;
    const SIGNED_BY: &'static [SignerRole] = &[];
}

impl Stage for ProviderSigned {
    const STAGE: SigningStage = SigningStage::ProviderSigned;
    const ACTOR: SignerRole = SignerRole::Issuer;
    const SIGNED_BY: &'static [SignerRole] = &[SignerRole::Provider];
}

impl Stage for FullySigned {
    const STAGE: SigningStage = SigningStage::FullySigned;
    const ACTOR: SignerRole = SignerRole::Middleware;
    const SIGNED_BY: &'static [SignerRole] = &[SignerRole::Provider, SignerRole::Issuer];
}

impl Stage for Submitted {
    const STAGE: SigningStage = SigningStage::Submitted;
    const ACTOR: SignerRole = SignerRole::Middleware;
    const SIGNED_BY: &'static [SignerRole] = &[SignerRole::Provider, SignerRole::Issuer];
}

// =============================================================================
// PAYLOAD
// =============================================================================

/// Immutable body of a status transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    /// Alias name (normalized).
    pub name: String,
    /// Approve or reject.
    pub action: StatusAction,
    /// Applicant of the referenced application.
    pub applicant: Address,
    /// Id of the referenced application.
    #[serde(with = "hex_hash")]
    pub application_id: Hash,
    /// Provider that built the transaction.
    pub initiator: Address,
}

impl StatusPayload {
    /// `keccak("qc-18/status" ‖ payload)`.
    pub fn digest(&self) -> Hash {
        hash_parts(&[
            b"qc-18/status",
            self.name.as_bytes(),
            &[self.action.tag()],
            self.applicant.as_bytes(),
            &self.application_id,
            self.initiator.as_bytes(),
        ])
    }
}

/// A signature together with the role and address that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSignature {
    /// Role of the signer.
    pub role: SignerRole,
    /// Claimed signer address.
    pub signer: Address,
    /// The signature.
    pub signature: EcdsaSignature,
}

/// Fold the payload digest over attached signatures.
fn chain_digest(payload: &StatusPayload, signatures: &[RoleSignature]) -> Hash {
    signatures.iter().fold(payload.digest(), |digest, sig| {
        hash_parts(&[&digest, &sig.signature.to_bytes()])
    })
}

/// Verify roles, order and recovered signers of a signature chain.
fn verify_chain(
    payload: &StatusPayload,
    signatures: &[RoleSignature],
    stage: SigningStage,
    expected_roles: &[SignerRole],
) -> Result<(), AliasError> {
    if signatures.len() != expected_roles.len() {
        return Err(AliasError::InvalidSignatureOrder {
            role: signatures
                .get(expected_roles.len())
                .map(|s| s.role)
                .or_else(|| expected_roles.get(signatures.len()).copied())
                .unwrap_or(SignerRole::Provider),
            stage,
        });
    }

    for (index, (sig, role)) in signatures.iter().zip(expected_roles).enumerate() {
        if sig.role != *role {
            return Err(AliasError::InvalidSignatureOrder {
                role: sig.role,
                stage,
            });
        }
        let digest = chain_digest(payload, &signatures[..index]);
        let recovered = recover_address(&digest, &sig.signature)?;
        if recovered != sig.signer {
            return Err(AliasError::InvalidSignature(format!(
                "{} signature recovers to {}, claimed {}",
                sig.role, recovered, sig.signer
            )));
        }
    }

    if let Some(provider) = signatures.first() {
        if provider.signer != payload.initiator {
            return Err(AliasError::UnauthorizedSigner {
                role: SignerRole::Provider,
                expected: payload.initiator,
                actual: provider.signer,
            });
        }
    }
    if let [provider, issuer] = signatures {
        if provider.signer == issuer.signer {
            return Err(AliasError::InvalidSignatureOrder {
                role: SignerRole::Issuer,
                stage: SigningStage::ProviderSigned,
            });
        }
    }

    Ok(())
}

// =============================================================================
// TYPE-STATE TRANSACTION
// =============================================================================

/// A status transaction with compile-time enforced signing stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransaction<S: Stage> {
    payload: StatusPayload,
    signatures: Vec<RoleSignature>,
    _stage: PhantomData<S>,
}

impl<S: Stage> StatusTransaction<S> {
    /// The immutable payload.
    pub fn payload(&self) -> &StatusPayload {
        &self.payload
    }

    /// Alias name.
    pub fn name(&self) -> &str {
        &self.payload.name
    }

    /// Approve or reject.
    pub fn action(&self) -> StatusAction {
        self.payload.action
    }

    /// Attached signatures, in signing order.
    pub fn signatures(&self) -> &[RoleSignature] {
        &self.signatures
    }

    /// Runtime stage.
    pub fn stage(&self) -> SigningStage {
        S::STAGE
    }

    /// Digest the next signer signs.
    pub fn signing_digest(&self) -> Hash {
        chain_digest(&self.payload, &self.signatures)
    }

    fn signature_of(&self, role: SignerRole) -> Option<&RoleSignature> {
        self.signatures.iter().find(|s| s.role == role)
    }

    fn advance<N: Stage>(mut self, signature: RoleSignature) -> StatusTransaction<N> {
        self.signatures.push(signature);
        StatusTransaction {
            payload: self.payload,
            signatures: self.signatures,
            _stage: PhantomData,
        }
    }

    async fn signed_by(
        &self,
        role: SignerRole,
        signer: &dyn AliasSigner,
    ) -> Result<RoleSignature, AliasError> {
        let digest = self.signing_digest();
        let signature = signer.sign_digest(&digest).await?;
        Ok(RoleSignature {
            role,
            signer: signer.address(),
            signature,
        })
    }
}

impl StatusTransaction<Unsigned> {
    /// Wrap a payload. Does not sign.
    pub fn new(payload: StatusPayload) -> Self {
        Self {
            payload,
            signatures: Vec::new(),
            _stage: PhantomData,
        }
    }

    /// Attach a provider signature produced elsewhere.
    ///
    /// The signer must be the payload's initiator.
    #[must_use = "the provider-signed transaction must be handed to the issuer"]
    pub fn attach_provider(
        self,
        signature: RoleSignature,
    ) -> Result<StatusTransaction<ProviderSigned>, AliasError> {
        if signature.role != SignerRole::Provider {
            return Err(AliasError::InvalidSignatureOrder {
                role: signature.role,
                stage: SigningStage::Unsigned,
            });
        }
        if signature.signer != self.payload.initiator {
            return Err(AliasError::UnauthorizedSigner {
                role: SignerRole::Provider,
                expected: self.payload.initiator,
                actual: signature.signer,
            });
        }
        verify_signer(
            &self.signing_digest(),
            &signature.signature,
            SignerRole::Provider,
            signature.signer,
        )
        .map_err(|e| AliasError::InvalidSignature(e.to_string()))?;
        Ok(self.advance(signature))
    }

    /// Provider signs.
    pub async fn sign(
        self,
        provider: &dyn AliasSigner,
    ) -> Result<StatusTransaction<ProviderSigned>, AliasError> {
        let signature = self.signed_by(SignerRole::Provider, provider).await?;
        self.attach_provider(signature)
    }
}

impl StatusTransaction<ProviderSigned> {
    /// Attach an issuer signature produced elsewhere.
    ///
    /// The issuer must be a different address than the provider.
    #[must_use = "the fully-signed transaction must be broadcast"]
    pub fn attach_issuer(
        self,
        signature: RoleSignature,
    ) -> Result<StatusTransaction<FullySigned>, AliasError> {
        if signature.role != SignerRole::Issuer {
            return Err(AliasError::InvalidSignatureOrder {
                role: signature.role,
                stage: SigningStage::ProviderSigned,
            });
        }
        if self
            .signature_of(SignerRole::Provider)
            .is_some_and(|p| p.signer == signature.signer)
        {
            return Err(AliasError::InvalidSignatureOrder {
                role: SignerRole::Issuer,
                stage: SigningStage::ProviderSigned,
            });
        }
        verify_signer(
            &self.signing_digest(),
            &signature.signature,
            SignerRole::Issuer,
            signature.signer,
        )
        .map_err(|e| AliasError::InvalidSignature(e.to_string()))?;
        Ok(self.advance(signature))
    }

    /// Issuer co-signs.
    pub async fn sign(
        self,
        issuer: &dyn AliasSigner,
    ) -> Result<StatusTransaction<FullySigned>, AliasError> {
        let signature = self.signed_by(SignerRole::Issuer, issuer).await?;
        self.attach_issuer(signature)
    }

    /// Provider signature.
    pub fn provider_signature(&self) -> Option<&RoleSignature> {
        self.signature_of(SignerRole::Provider)
    }
}

impl StatusTransaction<FullySigned> {
    /// Hand the transaction to the ledger. No further mutation is possible.
    #[must_use = "the submitted transaction must be sent to the ledger"]
    pub fn into_submitted(self) -> StatusTransaction<Submitted> {
        StatusTransaction {
            payload: self.payload,
            signatures: self.signatures,
            _stage: PhantomData,
        }
    }
}

impl StatusTransaction<Submitted> {
    /// Check the chain and that each signature belongs to its configured role.
    pub fn verify_signatures(&self, authorities: &RoleAuthorities) -> Result<(), AliasError> {
        verify_chain(
            &self.payload,
            &self.signatures,
            SigningStage::Submitted,
            Submitted::SIGNED_BY,
        )?;

        for sig in &self.signatures {
            let expected = match sig.role {
                SignerRole::Provider => authorities.provider,
                SignerRole::Issuer => authorities.issuer,
                other => {
                    return Err(AliasError::InvalidSignatureOrder {
                        role: other,
                        stage: SigningStage::Submitted,
                    })
                }
            };
            if sig.signer != expected {
                return Err(AliasError::UnauthorizedSigner {
                    role: sig.role,
                    expected,
                    actual: sig.signer,
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// BROADCAST
// =============================================================================

/// A submitted status transaction wrapped with the middleware's signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BroadcastTransaction {
    /// The co-signed status transaction.
    pub tx: StatusTransaction<Submitted>,
    /// Middleware address.
    pub sender: Address,
    /// Sender account nonce.
    pub nonce: u64,
    /// Optional memo.
    pub memo: Option<String>,
    /// Middleware signature over [`BroadcastTransaction::digest_for`].
    pub signature: EcdsaSignature,
}

impl BroadcastTransaction {
    /// Digest the middleware signs.
    pub fn digest_for(
        tx: &StatusTransaction<FullySigned>,
        sender: Address,
        nonce: u64,
        memo: Option<&str>,
    ) -> Hash {
        broadcast_digest(tx.signing_digest(), sender, nonce, memo)
    }

    /// Recompute the signed digest.
    pub fn digest(&self) -> Hash {
        broadcast_digest(
            self.tx.signing_digest(),
            self.sender,
            self.nonce,
            self.memo.as_deref(),
        )
    }

    /// Transaction hash reported in receipts.
    pub fn tx_hash(&self) -> Hash {
        hash_parts(&[&self.digest(), &self.signature.to_bytes()])
    }

    /// Alias the transaction refers to.
    pub fn name(&self) -> &str {
        self.tx.name()
    }
}

fn broadcast_digest(chain: Hash, sender: Address, nonce: u64, memo: Option<&str>) -> Hash {
    hash_parts(&[
        b"qc-18/broadcast",
        &chain,
        sender.as_bytes(),
        &nonce.to_be_bytes(),
        memo.unwrap_or_default().as_bytes(),
    ])
}

// =============================================================================
// HAND-OFF ENVELOPE
// =============================================================================

/// Serializable form of a status transaction for out-of-process hand-off.
///
/// ```json
/// { "stage": "provider_signed", "payload": { ... }, "signatures": [ ... ] }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransactionEnvelope {
    /// Claimed stage.
    pub stage: SigningStage,
    /// Transaction body.
    pub payload: StatusPayload,
    /// Signatures in signing order.
    #[serde(default)]
    pub signatures: Vec<RoleSignature>,
}

impl StatusTransactionEnvelope {
    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, AliasError> {
        serde_json::to_string(self).map_err(|e| AliasError::Ledger(format!("envelope encode: {e}")))
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> Result<Self, AliasError> {
        serde_json::from_str(json).map_err(|e| AliasError::Ledger(format!("envelope decode: {e}")))
    }

    /// Sign as `role`.
    ///
    /// Only `Unsigned + Provider` and `ProviderSigned + Issuer` are valid;
    /// anything else fails with `INVALID_SIGNATURE_ORDER`.
    pub async fn sign(
        self,
        role: SignerRole,
        signer: &dyn AliasSigner,
    ) -> Result<StatusTransactionEnvelope, AliasError> {
        match (self.stage, role) {
            (SigningStage::Unsigned, SignerRole::Provider) => {
                let tx = StatusTransaction::<Unsigned>::try_from(self)?;
                Ok(tx.sign(signer).await?.into())
            }
            (SigningStage::ProviderSigned, SignerRole::Issuer) => {
                let tx = StatusTransaction::<ProviderSigned>::try_from(self)?;
                Ok(tx.sign(signer).await?.into())
            }
            (stage, role) => Err(AliasError::InvalidSignatureOrder { role, stage }),
        }
    }
}

impl<S: Stage> From<StatusTransaction<S>> for StatusTransactionEnvelope {
    fn from(tx: StatusTransaction<S>) -> Self {
        Self {
            stage: S::STAGE,
            payload: tx.payload,
            signatures: tx.signatures,
        }
    }
}

impl<S: Stage> TryFrom<StatusTransactionEnvelope> for StatusTransaction<S> {
    type Error = AliasError;

    /// Recover a typed transaction.
    ///
    /// An envelope behind the requested stage fails with
    /// `INCOMPLETE_SIGNATURES`; any other mismatch with
    /// `INVALID_SIGNATURE_ORDER`.
    fn try_from(envelope: StatusTransactionEnvelope) -> Result<Self, Self::Error> {
        if envelope.stage < S::STAGE {
            return Err(AliasError::IncompleteSignatures(envelope.stage));
        }
        if envelope.stage > S::STAGE {
            return Err(AliasError::InvalidSignatureOrder {
                role: S::ACTOR,
                stage: envelope.stage,
            });
        }
        if envelope.signatures.len() < S::SIGNED_BY.len() {
            return Err(AliasError::IncompleteSignatures(envelope.stage));
        }
        verify_chain(
            &envelope.payload,
            &envelope.signatures,
            envelope.stage,
            S::SIGNED_BY,
        )?;

        Ok(Self {
            payload: envelope.payload,
            signatures: envelope.signatures,
            _stage: PhantomData,
        })
    }
}
