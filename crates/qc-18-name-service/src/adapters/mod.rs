//! # Adapters Layer
//!
//! Concrete implementations of the outbound ports.

pub mod local_wallet;
pub mod memory_ledger;
pub mod observer;

pub use local_wallet::LocalWallet;
pub use memory_ledger::InMemoryLedger;
pub use observer::{NoopObserver, ObservedEvent, RecordingObserver, TracingObserver};
