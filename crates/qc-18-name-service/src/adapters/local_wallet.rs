//! In-process secp256k1 wallet.

use crate::domain::{address_from_pubkey, sign_digest, Address, AliasError, EcdsaSignature, Hash};
use crate::ports::outbound::AliasSigner;
use async_trait::async_trait;
use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use std::fmt;

/// Wallet holding a private key in memory.
#[derive(Clone)]
pub struct LocalWallet {
    key: SigningKey,
    address: Address,
}

impl LocalWallet {
    /// Fresh random key.
    pub fn random() -> Self {
        Self::from_key(SigningKey::random(&mut OsRng))
    }

    /// Wrap an existing key.
    pub fn from_key(key: SigningKey) -> Self {
        let address = address_from_pubkey(key.verifying_key());
        Self { key, address }
    }

    /// Load from a 32-byte hex private key, with or without `0x`.
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, AliasError> {
        let bytes = hex::decode(hex_key.trim().trim_start_matches("0x"))
            .map_err(|e| AliasError::InvalidKey(format!("private key hex: {e}")))?;
        let key = SigningKey::from_slice(&bytes)
            .map_err(|_| AliasError::InvalidKey("private key out of range".into()))?;
        Ok(Self::from_key(key))
    }

    /// Wallet address.
    pub fn address(&self) -> Address {
        self.address
    }
}

impl fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AliasSigner for LocalWallet {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_digest(&self, digest: &Hash) -> Result<EcdsaSignature, AliasError> {
        sign_digest(&self.key, digest)
    }
}
