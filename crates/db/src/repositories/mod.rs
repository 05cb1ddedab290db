//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Each one also implements the matching ledger collaborator trait.

pub mod account;
pub mod error;
pub mod journal;
pub mod records;

pub use account::AccountRepository;
pub use error::RepositoryError;
pub use journal::JournalRepository;
pub use records::{BusinessRecordRepository, CreateExpenseInput, CreateTransactionInput};
