//! # Ports Layer
//!
//! Hexagonal boundaries: what the service offers and what it needs.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
