//! # Application Intake Transactions
//!
//! A create request is signed by the applicant and carries the fee
//! descriptor verbatim. The ledger recovers the applicant from the signature,
//! so a request cannot be filed on someone else's behalf.

use super::entities::{Address, FeeDescriptor, Hash};
use super::errors::AliasError;
use super::signing::{hash_parts, recover_address, EcdsaSignature};
use super::status_tx::SignerRole;
use serde::{Deserialize, Serialize};

/// Unsigned create-alias request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAliasRequest {
    /// Requested alias name.
    pub name: String,
    /// Applicant address.
    pub applicant: Address,
    /// Fee descriptor.
    pub fee: FeeDescriptor,
    /// Applicant account nonce.
    pub nonce: u64,
    /// Optional memo.
    #[serde(default)]
    pub memo: Option<String>,
}

impl CreateAliasRequest {
    /// `keccak("qc-18/create" ‖ name ‖ applicant ‖ collector ‖ amount ‖ nonce ‖ memo)`.
    pub fn signing_digest(&self) -> Hash {
        hash_parts(&[
            b"qc-18/create",
            self.name.as_bytes(),
            self.applicant.as_bytes(),
            self.fee.to.as_bytes(),
            self.fee.value.as_bytes(),
            &self.nonce.to_be_bytes(),
            self.memo.as_deref().unwrap_or_default().as_bytes(),
        ])
    }
}

/// Create request with the applicant's signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCreateAlias {
    /// The request.
    pub request: CreateAliasRequest,
    /// Applicant signature over [`CreateAliasRequest::signing_digest`].
    pub signature: EcdsaSignature,
}

impl SignedCreateAlias {
    /// Transaction hash reported in receipts.
    pub fn tx_hash(&self) -> Hash {
        hash_parts(&[&self.request.signing_digest(), &self.signature.to_bytes()])
    }

    /// Recover the signer and require it to be the named applicant.
    pub fn verify_applicant(&self) -> Result<Address, AliasError> {
        let actual = recover_address(&self.request.signing_digest(), &self.signature)?;
        if actual != self.request.applicant {
            return Err(AliasError::UnauthorizedSigner {
                role: SignerRole::Applicant,
                expected: self.request.applicant,
                actual,
            });
        }
        Ok(actual)
    }
}
