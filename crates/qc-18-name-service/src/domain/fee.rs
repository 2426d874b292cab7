//! # Fee Validation
//!
//! Pure checks on an application fee. Moving funds is the ledger's job.

use super::entities::{Address, FeeDescriptor, FeeRecord, U256};
use super::errors::AliasError;

impl TryFrom<&FeeDescriptor> for FeeRecord {
    type Error = AliasError;

    fn try_from(descriptor: &FeeDescriptor) -> Result<Self, Self::Error> {
        let value = descriptor.value.trim();
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AliasError::InvalidFee(format!(
                "value must be an unsigned decimal integer, got {:?}",
                descriptor.value
            )));
        }
        let amount = U256::from_dec_str(value)
            .map_err(|e| AliasError::InvalidFee(format!("{e:?}")))?;
        Ok(FeeRecord {
            collector: descriptor.to,
            amount,
        })
    }
}

/// Validates fees against the configured collector.
#[derive(Clone, Copy, Debug)]
pub struct FeeValidator {
    collector: Address,
}

impl FeeValidator {
    /// Validator accepting fees paid to `collector`.
    pub fn new(collector: Address) -> Self {
        Self { collector }
    }

    /// Configured collector.
    pub fn collector(&self) -> Address {
        self.collector
    }

    /// `amount > 0` and `collector` is the configured one.
    pub fn validate(&self, fee: &FeeRecord) -> Result<(), AliasError> {
        if fee.amount.is_zero() {
            return Err(AliasError::InvalidFee("amount must be greater than zero".into()));
        }
        if fee.collector != self.collector {
            return Err(AliasError::InvalidFee(format!(
                "collector {} is not the fee collector {}",
                fee.collector, self.collector
            )));
        }
        Ok(())
    }

    /// Parse and validate a wire descriptor.
    pub fn validate_descriptor(&self, descriptor: &FeeDescriptor) -> Result<FeeRecord, AliasError> {
        let fee = FeeRecord::try_from(descriptor)?;
        self.validate(&fee)?;
        Ok(fee)
    }
}
