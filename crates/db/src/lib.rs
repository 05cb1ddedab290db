//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository implementations of the ledger collaborator traits
//! - Database migrations, including the shared default chart of accounts

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AccountRepository, BusinessRecordRepository, JournalRepository, RepositoryError,
};

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tally_core::ledger::PostingService;
use tally_shared::{DatabaseConfig, LedgerConfig};

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);

    Database::connect(options).await
}

/// Builds a posting service backed by the repositories of this crate.
#[must_use]
pub fn posting_service(db: &DatabaseConnection, config: LedgerConfig) -> PostingService {
    PostingService::new(
        Arc::new(AccountRepository::new(db.clone())),
        Arc::new(JournalRepository::new(db.clone())),
        Arc::new(BusinessRecordRepository::new(db.clone())),
        config,
    )
}
