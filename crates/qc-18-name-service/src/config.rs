//! Name Service configuration.
//!
//! `RegistryConfig` is the ledger side: who collects fees and which
//! addresses hold the provider, issuer and middleware roles.
//! `NameServiceConfig` is the client side: local pre-validation rules and
//! trace switches.
//!
//! ## Environment Variables
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `QC_NS_FEE_COLLECTOR` | yes | Fee collector address |
//! | `QC_NS_PROVIDER` | ledger | Provider address |
//! | `QC_NS_ISSUER` | ledger | Issuer address |
//! | `QC_NS_MIDDLEWARE` | ledger | Middleware address |
//! | `QC_NS_MAX_NAME_LENGTH` | no | Name length limit (default 64) |

use crate::domain::{Address, FeeValidator, RoleAuthorities, DEFAULT_MAX_NAME_LENGTH};
use quantum_telemetry::TraceConfig;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset.
    #[error("Missing configuration value: {0}")]
    Missing(&'static str),

    /// A variable is set but unusable.
    #[error("Invalid configuration value {key}: {reason}")]
    Invalid {
        /// Variable name
        key: &'static str,
        /// Parse failure
        reason: String,
    },
}

fn required_address(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Address, ConfigError> {
    let raw = lookup(key).ok_or(ConfigError::Missing(key))?;
    raw.parse().map_err(|e: crate::domain::AliasError| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

fn max_name_length(lookup: &impl Fn(&str) -> Option<String>) -> Result<usize, ConfigError> {
    const KEY: &str = "QC_NS_MAX_NAME_LENGTH";
    match lookup(KEY) {
        None => Ok(DEFAULT_MAX_NAME_LENGTH),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(0) => Err(ConfigError::Invalid {
                key: KEY,
                reason: "must be at least 1".into(),
            }),
            Ok(n) => Ok(n),
            Err(e) => Err(ConfigError::Invalid {
                key: KEY,
                reason: e.to_string(),
            }),
        },
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

// =============================================================================
// LEDGER SIDE
// =============================================================================

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Only valid fee recipient.
    pub fee_collector: Address,
    /// Role holders.
    pub authorities: RoleAuthorities,
    /// Name length limit.
    pub max_name_length: usize,
}

impl RegistryConfig {
    /// Configuration with the default name length limit.
    pub fn new(fee_collector: Address, authorities: RoleAuthorities) -> Self {
        Self {
            fee_collector,
            authorities,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }

    /// Load from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Load from an arbitrary key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            fee_collector: required_address(&lookup, "QC_NS_FEE_COLLECTOR")?,
            authorities: RoleAuthorities {
                provider: required_address(&lookup, "QC_NS_PROVIDER")?,
                issuer: required_address(&lookup, "QC_NS_ISSUER")?,
                middleware: required_address(&lookup, "QC_NS_MIDDLEWARE")?,
            },
            max_name_length: max_name_length(&lookup)?,
        })
    }

    /// Fee validator for this configuration.
    pub fn fee_validator(&self) -> FeeValidator {
        FeeValidator::new(self.fee_collector)
    }
}

// =============================================================================
// CLIENT SIDE
// =============================================================================

/// Service (client) configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameServiceConfig {
    /// Fee collector used for local pre-validation.
    pub fee_collector: Address,
    /// Name length limit used for local pre-validation.
    pub max_name_length: usize,
    /// Trace switches handed to the observer.
    pub trace: TraceConfig,
}

impl NameServiceConfig {
    /// Silent configuration with default name rules.
    pub fn new(fee_collector: Address) -> Self {
        Self {
            fee_collector,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            trace: TraceConfig::default(),
        }
    }

    /// Replace the trace switches.
    pub fn with_trace(mut self, trace: TraceConfig) -> Self {
        self.trace = trace;
        self
    }

    /// Load from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            fee_collector: required_address(&env_lookup, "QC_NS_FEE_COLLECTOR")?,
            max_name_length: max_name_length(&env_lookup)?,
            trace: TraceConfig::from_env(),
        })
    }

    /// Fee validator for local pre-validation.
    pub fn fee_validator(&self) -> FeeValidator {
        FeeValidator::new(self.fee_collector)
    }
}

impl From<&RegistryConfig> for NameServiceConfig {
    fn from(config: &RegistryConfig) -> Self {
        Self {
            fee_collector: config.fee_collector,
            max_name_length: config.max_name_length,
            trace: TraceConfig::default(),
        }
    }
}
