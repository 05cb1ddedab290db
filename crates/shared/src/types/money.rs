//! Positive monetary amounts with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons an amount is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Amount is zero.
    #[error("Amount cannot be zero")]
    Zero,
    /// Amount is negative.
    #[error("Amount cannot be negative")]
    Negative,
}

/// A strictly positive amount in currency units (e.g. `1500.00`).
///
/// Every journal line carries one of these together with its side, so a
/// line can never hold both a debit and a credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Creates a new amount, rejecting zero and negative values.
    ///
    /// # Errors
    ///
    /// Returns `AmountError` if the value is not strictly positive.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_zero() {
            return Err(AmountError::Zero);
        }
        if value.is_sign_negative() {
            return Err(AmountError::Negative);
        }
        Ok(Self(value))
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
