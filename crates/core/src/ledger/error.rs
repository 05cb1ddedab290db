//! Ledger error types.
//!
//! Errors are split in two groups. Hard failures (`InvalidAmount`,
//! `AccountNotFound`) abort the operation and reach the caller. Soft failures
//! are logged by [`PostingService`](super::PostingService) and reported as
//! "nothing was posted".

use rust_decimal::Decimal;
use tally_shared::AppError;
use tally_shared::types::{AmountError, JournalEntryId, JournalLineId, TenantId};
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Total debits and total credits differ by more than the tolerance.
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    BalanceViolation {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Journal entry has no lines.
    #[error("Journal entry must have at least one line")]
    EmptyEntry,

    /// Posting amount is zero or negative.
    #[error("Invalid posting amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// Stored line has neither (or both) a debit and a credit.
    #[error("Journal line {0} has no single debit or credit side")]
    InvalidLine(JournalLineId),

    // ========== Account Errors ==========
    /// Account code does not resolve for the tenant.
    #[error("Account {code} not found for tenant {tenant_id}")]
    AccountNotFound {
        /// The account code that failed to resolve.
        code: String,
        /// The tenant the lookup was scoped to.
        tenant_id: TenantId,
    },

    // ========== Reversal Errors ==========
    /// The entry to reverse does not exist.
    #[error("Journal entry to reverse not found: {0}")]
    ReversalTargetMissing(JournalEntryId),

    // ========== Persistence Errors ==========
    /// Lower-layer failure while reading or writing.
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BalanceViolation { .. } => "BALANCE_VIOLATION",
            Self::EmptyEntry => "EMPTY_ENTRY",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidLine(_) => "INVALID_LINE",
            Self::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
            Self::ReversalTargetMissing(_) => "REVERSAL_TARGET_MISSING",
            Self::Persistence(_) => "PERSISTENCE_FAILURE",
        }
    }

    /// Returns true if the posting service absorbs this error into an
    /// absence signal instead of returning it.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidAmount(_) | Self::AccountNotFound { .. })
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::BalanceViolation { .. }
            | LedgerError::EmptyEntry
            | LedgerError::InvalidLine(_) => Self::BusinessRule(message),
            LedgerError::InvalidAmount(_) => Self::Validation(message),
            LedgerError::AccountNotFound { .. } | LedgerError::ReversalTargetMissing(_) => {
                Self::NotFound(message)
            }
            LedgerError::Persistence(_) => Self::Database(message),
        }
    }
}
