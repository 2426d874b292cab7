//! # Name Service Subsystem
//!
//! **Subsystem ID:** 18
//!
//! ## Purpose
//!
//! Resolves human-readable aliases to ledger addresses and back. An alias
//! becomes active only after three independent parties agree: the provider
//! initiates an approve or reject, the issuer co-signs, and the middleware
//! broadcasts.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Name unique among pending and approved aliases | `domain/registry.rs` - `create_application()` |
//! | One pending application per applicant | `domain/registry.rs` - `create_application()` |
//! | One approved alias per owner | `domain/registry.rs` - `commit_status()` |
//! | Provider signs before issuer | `domain/status_tx.rs` - type-state transitions |
//! | Broadcast only when fully signed | `domain/status_tx.rs` - `into_submitted()` |
//! | Atomic commit | `adapters/memory_ledger.rs` - single write lock |
//!
//! ## Alias State Machine
//!
//! ```text
//! None ──create──→ Pending ──approve commit──→ Approved
//!                     │
//!                     ├──reject commit──→ None
//!                     └──duplicate create──→ Pending (EXISTS / NOT_ALLOWED)
//! Approved/None ──status tx──→ NOT_FOUND (no transition)
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/memory_ledger.rs - InMemoryLedger (LedgerGateway)     │
//! │  adapters/local_wallet.rs  - LocalWallet (AliasSigner)          │
//! │  adapters/observer.rs      - Tracing/Recording observers        │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - NameServiceApi trait                       │
//! │  ports/outbound.rs - LedgerGateway, AliasSigner, AliasObserver, │
//! │                      TimeSource traits                          │
//! │  service.rs        - NameService (implements NameServiceApi)    │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/entities.rs   - Address, Alias, Application, Receipt    │
//! │  domain/registry.rs   - AliasRegistry state machine             │
//! │  domain/status_tx.rs  - StatusTransaction<S> type-state         │
//! │  domain/intake.rs     - Signed create requests                  │
//! │  domain/signing.rs    - secp256k1 sign/recover, keccak digests  │
//! │  domain/fee.rs        - FeeValidator                            │
//! │  domain/invariants.rs - Name rules                              │
//! │  domain/errors.rs     - AliasError, ErrorCode                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## TypeState Pattern (Compile-Time Safety)
//!
//! ```rust,ignore
//! let tx: StatusTransaction<ProviderSigned> = service.approve_alias("a1b2c3d4", &provider).await?;
//! let tx: StatusTransaction<FullySigned> = service.sign_alias_status_transaction(tx, &issuer).await?;
//! let receipt = service.send_alias_status_transaction(tx, &middleware, Overrides::default()).await?;
//! ```

#![warn(missing_docs)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use config::*;
pub use domain::*;
pub use ports::*;
pub use service::NameService;
