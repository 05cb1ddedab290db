//! Collaborator traits for account lookup and persistence.
//!
//! The posting service never reaches a database directly; it is handed
//! implementations of these traits at construction time.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tally_shared::types::{
    AccountId, ExpenseId, JournalEntryId, PageRequest, TenantId, TransactionId,
};

use super::error::LedgerError;
use super::types::{JournalEntry, JournalLine, NewJournalEntry};

/// A chart-of-accounts record visible to a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// The account ID.
    pub id: AccountId,
    /// Numeric account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Owning tenant; `None` for a shared default account.
    pub tenant_id: Option<TenantId>,
}

/// Resolves account codes against a tenant's chart of accounts.
#[async_trait]
pub trait AccountResolver: Send + Sync {
    /// Resolves `code` for `tenant_id`.
    ///
    /// A tenant-scoped account wins over a shared one with the same code.
    async fn lookup_account_id(
        &self,
        code: &str,
        tenant_id: TenantId,
    ) -> Result<Option<AccountId>, LedgerError>;

    /// Lists every account visible to the tenant (own and shared).
    async fn list_accounts(&self, tenant_id: TenantId) -> Result<Vec<AccountInfo>, LedgerError>;
}

/// Journal persistence.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Numbers and writes an entry with all of its lines atomically.
    ///
    /// Either the entry and every line become visible, or nothing does.
    async fn create_entry(&self, entry: NewJournalEntry) -> Result<JournalEntry, LedgerError>;

    /// Counts the tenant's entries.
    async fn count_entries(&self, tenant_id: TenantId) -> Result<u64, LedgerError>;

    /// Loads an entry with its lines.
    async fn find_entry(&self, id: JournalEntryId) -> Result<Option<JournalEntry>, LedgerError>;

    /// Loads the earliest-created entry whose reference equals `reference`.
    async fn find_by_reference(&self, reference: &str)
    -> Result<Option<JournalEntry>, LedgerError>;

    /// Like [`JournalStore::find_by_reference`], restricted to one tenant.
    ///
    /// Entry numbers repeat across tenants, so references derived from them
    /// (such as `REV-<entry_number>`) must be looked up within the tenant.
    async fn find_tenant_reference(
        &self,
        tenant_id: TenantId,
        reference: &str,
    ) -> Result<Option<JournalEntry>, LedgerError>;

    /// Lists a page of the tenant's entries, newest first.
    async fn list_entries(
        &self,
        tenant_id: TenantId,
        page: &PageRequest,
    ) -> Result<Vec<JournalEntry>, LedgerError>;

    /// Loads every line of the tenant's entries dated on or before `as_of`.
    async fn lines_for_tenant(
        &self,
        tenant_id: TenantId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<JournalLine>, LedgerError>;
}

/// Business records whose deletion triggers a reversal.
#[async_trait]
pub trait BusinessRecordStore: Send + Sync {
    /// Deletes a bank/cash transaction. Returns false if it did not exist.
    async fn delete_transaction(&self, id: TransactionId) -> Result<bool, LedgerError>;

    /// Deletes an expense. Returns false if it did not exist.
    async fn delete_expense(&self, id: ExpenseId) -> Result<bool, LedgerError>;
}
