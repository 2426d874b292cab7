//! # Domain Layer
//!
//! Pure alias state machine, signing protocol and validation rules.

pub mod entities;
pub mod errors;
pub mod fee;
pub mod intake;
pub mod invariants;
pub mod registry;
pub mod signing;
pub mod status_tx;

pub use entities::*;
pub use errors::*;
pub use fee::*;
pub use intake::*;
pub use invariants::*;
pub use registry::*;
pub use signing::{
    address_from_pubkey, hash_parts, keccak256, recover_address, sign_digest, verify_signer,
    EcdsaSignature,
};
pub use status_tx::*;
