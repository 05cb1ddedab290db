//! Repository error type.

use sea_orm::DbErr;
use tally_core::ledger::LedgerError;

/// Error types for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// A stored row cannot be mapped to a domain value.
    #[error("Corrupt row in {table}: {reason}")]
    CorruptRow {
        /// Table the row was read from.
        table: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

impl From<RepositoryError> for LedgerError {
    fn from(err: RepositoryError) -> Self {
        Self::Persistence(err.to_string())
    }
}
