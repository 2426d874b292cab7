//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for structured logging.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name stamped on every log line
    pub service_name: String,

    /// Subsystem identifier (e.g. "18")
    pub subsystem_id: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable console output (for development)
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "quantum-chain".to_string(),
            subsystem_id: "00".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Read `OTEL_SERVICE_NAME`, `QC_SUBSYSTEM_ID`, `QC_LOG_LEVEL` (falling
    /// back to `RUST_LOG`), `QC_CONSOLE_OUTPUT` and `QC_JSON_LOGS`.
    ///
    /// JSON output defaults on inside containers.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let in_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();
        let flag = |key: &str| lookup(key).map(|v| parse_flag(&v));

        Self {
            service_name: lookup("OTEL_SERVICE_NAME").unwrap_or(defaults.service_name),
            subsystem_id: lookup("QC_SUBSYSTEM_ID").unwrap_or(defaults.subsystem_id),
            log_level: lookup("QC_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            console_output: flag("QC_CONSOLE_OUTPUT").unwrap_or(defaults.console_output),
            json_logs: flag("QC_JSON_LOGS").unwrap_or(in_container),
        }
    }

    /// Environment configuration named `qc-<id>-<name>`.
    pub fn for_subsystem(subsystem_id: &str, subsystem_name: &str) -> Self {
        Self {
            subsystem_id: subsystem_id.to_string(),
            service_name: format!("qc-{subsystem_id}-{subsystem_name}"),
            ..Self::from_env()
        }
    }

    /// Service name with the subsystem suffix, unless the subsystem is unset.
    pub fn full_service_name(&self) -> String {
        match self.subsystem_id.as_str() {
            "00" => self.service_name.clone(),
            id => format!("{}-{id}", self.service_name),
        }
    }
}

/// Per-context trace switches.
///
/// Passed explicitly to whatever component needs to decide whether to emit
/// verbose output. There is no global toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceConfig {
    /// Suppress lifecycle output (receipts, resolved names).
    pub silent: bool,
    /// Suppress RPC request/response and signing payload output.
    pub silent_rpc: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            silent: true,
            silent_rpc: true,
        }
    }
}

impl TraceConfig {
    /// Everything enabled.
    pub fn verbose() -> Self {
        Self {
            silent: false,
            silent_rpc: false,
        }
    }

    /// Read `QC_TRACE_SILENT` and `QC_TRACE_SILENT_RPC`.
    ///
    /// Unset variables keep the silent default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let flag = |key: &str| env::var(key).ok().map(|v| parse_flag(&v));
        Self {
            silent: flag("QC_TRACE_SILENT").unwrap_or(defaults.silent),
            silent_rpc: flag("QC_TRACE_SILENT_RPC").unwrap_or(defaults.silent_rpc),
        }
    }

    /// Whether lifecycle events should be logged.
    pub fn lifecycle_enabled(&self) -> bool {
        !self.silent
    }

    /// Whether RPC and signing payload events should be logged.
    pub fn rpc_enabled(&self) -> bool {
        !self.silent_rpc
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
