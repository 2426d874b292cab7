//! # Quantum-Chain Name Service Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Cross-component flows
//!     ├── approve_flow.rs   # create → approve → co-sign → broadcast
//!     ├── reject_flow.rs    # reject path, NOT_ALLOWED lookups, re-application
//!     ├── races.rs          # concurrent creates and status transactions
//!     └── handoff.rs        # JSON envelope hand-off and at-least-once delivery
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qc-tests
//! cargo test -p qc-tests integration::races
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
