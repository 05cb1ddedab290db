//! Double-entry bookkeeping logic.
//!
//! This module implements the ledger posting service:
//! - Fixed chart-of-accounts taxonomy
//! - Expense category classification
//! - Journal entry numbering
//! - Balance validation (debits = credits)
//! - Posting-line builders for business events
//! - Reversal (contra-entry) construction
//! - Trial balance calculation
//! - Collaborator traits for account lookup and persistence
//! - The async posting service orchestrating all of the above

pub mod balance;
pub mod chart;
pub mod classify;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod numbering;
pub mod posting;
pub mod reversal;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod reversal_props;
#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use balance::{TrialBalance, TrialBalanceRow};
pub use chart::{AccountCode, AccountKind};
pub use classify::classify_expense;
pub use error::LedgerError;
pub use gateway::{AccountInfo, AccountResolver, BusinessRecordStore, JournalStore};
pub use memory::InMemoryLedger;
pub use numbering::{format_entry_number, parse_entry_number};
pub use reversal::ReversalService;
pub use service::{DeletionOutcome, PostingService, ReversalStatus};
pub use types::{
    EntryDraft, EntrySide, EntryStatus, EntryTotals, ExpenseInput, IncomeInput, InvoiceInput,
    JournalEntry, JournalLine, NewJournalEntry, NewJournalLine, PostingLine,
};
pub use validation::validate_lines;
