//! # ECDSA Signing (secp256k1)
//!
//! Digest construction, signing and signer recovery for alias transactions.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: signatures are produced low-S and
//!   high-S signatures are rejected at recovery
//! - **Recovery ID**: `v` accepts both raw (0, 1) and legacy (27, 28) forms
//! - **Domain Separation**: every digest starts with a `qc-18/...` tag and
//!   every part is length-prefixed

use super::entities::{Address, Hash};
use super::errors::AliasError;
use super::status_tx::SignerRole;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;

/// Recoverable secp256k1 signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EcdsaSignature {
    /// R component
    pub r: [u8; 32],
    /// S component (low-S)
    pub s: [u8; 32],
    /// Recovery id, 27 or 28
    pub v: u8,
}

impl EcdsaSignature {
    /// `r ‖ s ‖ v`.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// Parse `r ‖ s ‖ v`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AliasError> {
        if bytes.len() != 65 {
            return Err(AliasError::InvalidSignature(format!(
                "expected 65 bytes, got {}",
                bytes.len()
            )));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] })
    }
}

impl fmt::Debug for EcdsaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcdsaSignature(0x{})", hex::encode(self.to_bytes()))
    }
}

impl Serialize for EcdsaSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("0x{}", hex::encode(self.to_bytes())))
    }
}

impl<'de> Deserialize<'de> for EcdsaSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)?;
        Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Serde helper rendering a 32-byte hash as `0x` hex.
pub mod hex_hash {
    use super::Hash;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as `0x` hex.
    pub fn serialize<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("0x{}", hex::encode(hash)))
    }

    /// Deserialize from `0x` hex.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32-byte hash"))
    }
}

// =============================================================================
// HASHING
// =============================================================================

/// Keccak256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Keccak256 over length-prefixed parts.
///
/// `hash_parts(&[b"ab", b"c"]) != hash_parts(&[b"a", b"bc"])`.
pub fn hash_parts(parts: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Derive the ledger address from a public key.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let pubkey_bytes = public_key.to_encoded_point(false);
    // Skip the 0x04 uncompressed prefix
    let hash = keccak256(&pubkey_bytes.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address(address)
}

// =============================================================================
// SIGN / RECOVER
// =============================================================================

/// Sign a 32-byte digest, normalizing to low-S.
pub fn sign_digest(key: &SigningKey, digest: &Hash) -> Result<EcdsaSignature, AliasError> {
    let (signature, recovery_id) = key
        .sign_prehash_recoverable(digest)
        .map_err(|e| AliasError::InvalidSignature(e.to_string()))?;

    let (signature, recovery_id) = match signature.normalize_s() {
        // Negating s flips the parity of R's y-coordinate.
        Some(normalized) => (
            normalized,
            RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
        ),
        None => (signature, recovery_id),
    };

    let bytes = signature.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);

    Ok(EcdsaSignature {
        r,
        s,
        v: 27 + recovery_id.to_byte(),
    })
}

/// Recover the signer address from a signature over `digest`.
pub fn recover_address(digest: &Hash, signature: &EcdsaSignature) -> Result<Address, AliasError> {
    let recovery_id = parse_recovery_id(signature.v)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);

    let sig = Signature::from_slice(&sig_bytes)
        .map_err(|_| AliasError::InvalidSignature("r or s out of range".into()))?;

    if sig.normalize_s().is_some() {
        return Err(AliasError::InvalidSignature("high-S signature".into()));
    }

    let key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| AliasError::InvalidSignature("public key recovery failed".into()))?;

    Ok(address_from_pubkey(&key))
}

/// Recover the signer and require it to be `expected`.
pub fn verify_signer(
    digest: &Hash,
    signature: &EcdsaSignature,
    role: SignerRole,
    expected: Address,
) -> Result<(), AliasError> {
    let actual = recover_address(digest, signature)?;
    if actual != expected {
        return Err(AliasError::UnauthorizedSigner {
            role,
            expected,
            actual,
        });
    }
    Ok(())
}

fn parse_recovery_id(v: u8) -> Result<RecoveryId, AliasError> {
    let normalized = match v {
        0 | 1 => v,
        27 | 28 => v - 27,
        _ => return Err(AliasError::InvalidSignature(format!("invalid recovery id {v}"))),
    };
    RecoveryId::from_byte(normalized)
        .ok_or_else(|| AliasError::InvalidSignature(format!("invalid recovery id {v}")))
}
