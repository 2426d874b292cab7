//! # Quantum Telemetry
//!
//! Structured logging and trace switches for Quantum-Chain subsystems.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quantum_telemetry::{init_logging, TelemetryConfig, TraceConfig};
//!
//! let config = TelemetryConfig::for_subsystem("18", "name-service");
//! init_logging(&config)?;
//!
//! // Threaded into components; never read from a global.
//! let trace = TraceConfig::from_env();
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `quantum-chain` | Service name in logs |
//! | `QC_LOG_LEVEL` | `info` | Log level filter |
//! | `QC_SUBSYSTEM_ID` | `00` | Subsystem identifier |
//! | `QC_JSON_LOGS` | `false` | JSON output |
//! | `QC_TRACE_SILENT` | `true` | Suppress lifecycle output |
//! | `QC_TRACE_SILENT_RPC` | `true` | Suppress RPC/payload output |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::{TelemetryConfig, TraceConfig};
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize logger: {0}")]
    LoggerInit(String),

    /// A configuration value could not be used.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience macro for creating a span with subsystem context.
///
/// # Example
///
/// ```rust,ignore
/// use quantum_telemetry::subsystem_span;
///
/// let _span = subsystem_span!("commit_status", subsystem = "qc-18", alias = "a1b2c3d4");
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
