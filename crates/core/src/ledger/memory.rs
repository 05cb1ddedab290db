//! In-memory implementation of the collaborator traits.
//!
//! Intended for tests/dev. A single lock guards all state, so an entry and
//! its lines are always written together.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use tally_shared::types::{
    AccountId, ExpenseId, JournalEntryId, JournalLineId, PageRequest, TenantId, TransactionId,
};

use super::chart::AccountCode;
use super::error::LedgerError;
use super::gateway::{AccountInfo, AccountResolver, BusinessRecordStore, JournalStore};
use super::numbering::format_entry_number;
use super::types::{EntryStatus, JournalEntry, JournalLine, NewJournalEntry};

#[derive(Debug, Default)]
struct State {
    accounts: Vec<AccountInfo>,
    entries: Vec<JournalEntry>,
    transactions: HashSet<TransactionId>,
    expenses: HashSet<ExpenseId>,
}

/// In-memory ledger store.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: RwLock<State>,
    fail_writes: AtomicBool,
}

impl InMemoryLedger {
    /// Creates an empty store with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the shared default chart of accounts.
    #[must_use]
    pub fn with_default_chart() -> Self {
        let store = Self::new();
        if let Ok(mut state) = store.state.write() {
            state.accounts = AccountCode::ALL
                .iter()
                .map(|account| AccountInfo {
                    id: AccountId::new(),
                    code: account.code().to_string(),
                    name: account.name().to_string(),
                    tenant_id: None,
                })
                .collect();
        }
        store
    }

    /// Adds an account to the chart and returns its id.
    pub fn add_account(&self, code: &str, name: &str, tenant_id: Option<TenantId>) -> AccountId {
        let id = AccountId::new();
        if let Ok(mut state) = self.state.write() {
            state.accounts.push(AccountInfo {
                id,
                code: code.to_string(),
                name: name.to_string(),
                tenant_id,
            });
        }
        id
    }

    /// Removes every account with `code`, shared or tenant-scoped.
    pub fn remove_account(&self, code: &str) {
        if let Ok(mut state) = self.state.write() {
            state.accounts.retain(|a| a.code != code);
        }
    }

    /// Registers a bank/cash transaction record.
    pub fn insert_transaction(&self, id: TransactionId) {
        if let Ok(mut state) = self.state.write() {
            state.transactions.insert(id);
        }
    }

    /// Registers an expense record.
    pub fn insert_expense(&self, id: ExpenseId) {
        if let Ok(mut state) = self.state.write() {
            state.expenses.insert(id);
        }
    }

    /// Returns true if the transaction record exists.
    #[must_use]
    pub fn contains_transaction(&self, id: TransactionId) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.transactions.contains(&id))
    }

    /// Returns true if the expense record exists.
    #[must_use]
    pub fn contains_expense(&self, id: ExpenseId) -> bool {
        self.state
            .read()
            .is_ok_and(|state| state.expenses.contains(&id))
    }

    /// Makes every subsequent write fail with a persistence error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of all entries in creation order.
    #[must_use]
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.state
            .read()
            .map(|state| state.entries.clone())
            .unwrap_or_default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, LedgerError> {
        self.state
            .read()
            .map_err(|_| LedgerError::Persistence("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, LedgerError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::Persistence(
                "write rejected by store".to_string(),
            ));
        }
        self.state
            .write()
            .map_err(|_| LedgerError::Persistence("lock poisoned".to_string()))
    }
}

fn in_period(date: NaiveDate, as_of: Option<NaiveDate>) -> bool {
    as_of.is_none_or(|limit| date <= limit)
}

#[async_trait]
impl AccountResolver for InMemoryLedger {
    async fn lookup_account_id(
        &self,
        code: &str,
        tenant_id: TenantId,
    ) -> Result<Option<AccountId>, LedgerError> {
        let state = self.read()?;
        let scoped = state
            .accounts
            .iter()
            .find(|a| a.code == code && a.tenant_id == Some(tenant_id));
        let shared = || {
            state
                .accounts
                .iter()
                .find(|a| a.code == code && a.tenant_id.is_none())
        };
        Ok(scoped.or_else(shared).map(|a| a.id))
    }

    async fn list_accounts(&self, tenant_id: TenantId) -> Result<Vec<AccountInfo>, LedgerError> {
        let state = self.read()?;
        Ok(state
            .accounts
            .iter()
            .filter(|a| a.tenant_id.is_none_or(|t| t == tenant_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl JournalStore for InMemoryLedger {
    async fn create_entry(&self, entry: NewJournalEntry) -> Result<JournalEntry, LedgerError> {
        let mut state = self.write()?;

        let existing = state
            .entries
            .iter()
            .filter(|e| e.tenant_id == entry.tenant_id)
            .count();
        let existing = u64::try_from(existing).unwrap_or(u64::MAX);
        let id = JournalEntryId::new();

        let created = JournalEntry {
            id,
            tenant_id: entry.tenant_id,
            entry_number: format_entry_number(entry.date.year(), existing),
            date: entry.date,
            description: entry.description,
            reference: entry.reference,
            status: EntryStatus::Posted,
            author: entry.author,
            created_at: Utc::now(),
            lines: entry
                .lines
                .into_iter()
                .zip(1..)
                .map(|(line, line_number)| {
                    let (debit, credit) = line.side.columns(line.amount);
                    JournalLine {
                        id: JournalLineId::new(),
                        entry_id: id,
                        account_id: line.account_id,
                        debit,
                        credit,
                        description: line.description,
                        line_number,
                    }
                })
                .collect(),
        };

        state.entries.push(created.clone());
        Ok(created)
    }

    async fn count_entries(&self, tenant_id: TenantId) -> Result<u64, LedgerError> {
        let state = self.read()?;
        let count = state
            .entries
            .iter()
            .filter(|e| e.tenant_id == tenant_id)
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn find_entry(&self, id: JournalEntryId) -> Result<Option<JournalEntry>, LedgerError> {
        let state = self.read()?;
        Ok(state.entries.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        let state = self.read()?;
        Ok(state
            .entries
            .iter()
            .find(|e| e.reference.as_deref() == Some(reference))
            .cloned())
    }

    async fn find_tenant_reference(
        &self,
        tenant_id: TenantId,
        reference: &str,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        let state = self.read()?;
        Ok(state
            .entries
            .iter()
            .find(|e| e.tenant_id == tenant_id && e.reference.as_deref() == Some(reference))
            .cloned())
    }

    async fn list_entries(
        &self,
        tenant_id: TenantId,
        page: &PageRequest,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        let state = self.read()?;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(state
            .entries
            .iter()
            .rev()
            .filter(|e| e.tenant_id == tenant_id)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn lines_for_tenant(
        &self,
        tenant_id: TenantId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<JournalLine>, LedgerError> {
        let state = self.read()?;
        Ok(state
            .entries
            .iter()
            .filter(|e| e.tenant_id == tenant_id && in_period(e.date, as_of))
            .flat_map(|e| e.lines.iter().cloned())
            .collect())
    }
}

#[async_trait]
impl BusinessRecordStore for InMemoryLedger {
    async fn delete_transaction(&self, id: TransactionId) -> Result<bool, LedgerError> {
        let mut state = self.write()?;
        Ok(state.transactions.remove(&id))
    }

    async fn delete_expense(&self, id: ExpenseId) -> Result<bool, LedgerError> {
        let mut state = self.write()?;
        Ok(state.expenses.remove(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{EntrySide, NewJournalLine};
    use rust_decimal_macros::dec;
    use tally_shared::types::Amount;

    fn new_entry(tenant_id: TenantId, reference: &str) -> NewJournalEntry {
        let amount = Amount::new(dec!(10)).unwrap();
        NewJournalEntry {
            tenant_id,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            description: "Test".to_string(),
            reference: Some(reference.to_string()),
            author: None,
            lines: vec![
                NewJournalLine {
                    account_id: AccountId::new(),
                    side: EntrySide::Debit,
                    amount,
                    description: "d".to_string(),
                },
                NewJournalLine {
                    account_id: AccountId::new(),
                    side: EntrySide::Credit,
                    amount,
                    description: "c".to_string(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_tenant_account_overrides_shared() {
        let store = InMemoryLedger::with_default_chart();
        let tenant = TenantId::new();
        let own = store.add_account("1000", "Petty Cash", Some(tenant));

        let resolved = store.lookup_account_id("1000", tenant).await.unwrap();
        assert_eq!(resolved, Some(own));

        let other = store.lookup_account_id("1000", TenantId::new()).await.unwrap();
        assert!(other.is_some());
        assert_ne!(other, Some(own));
    }

    #[tokio::test]
    async fn test_list_accounts_hides_other_tenants() {
        let store = InMemoryLedger::with_default_chart();
        let tenant = TenantId::new();
        store.add_account("1300", "Deposits", Some(TenantId::new()));

        let accounts = store.list_accounts(tenant).await.unwrap();
        assert_eq!(accounts.len(), AccountCode::ALL.len());
    }

    #[tokio::test]
    async fn test_create_entry_numbers_per_tenant() {
        let store = InMemoryLedger::new();
        let acme = TenantId::new();
        let globex = TenantId::new();

        let first = store.create_entry(new_entry(acme, "a")).await.unwrap();
        let other = store.create_entry(new_entry(globex, "b")).await.unwrap();
        let second = store.create_entry(new_entry(acme, "c")).await.unwrap();

        assert_eq!(first.entry_number, "JE-2025-000001");
        assert_eq!(other.entry_number, "JE-2025-000001");
        assert_eq!(second.entry_number, "JE-2025-000002");
        assert_eq!(second.lines[0].line_number, 1);
        assert_eq!(second.lines[1].line_number, 2);
        assert_eq!(store.count_entries(acme).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_tenant_reference_lookup_ignores_other_tenants() {
        let store = InMemoryLedger::new();
        let acme = TenantId::new();
        let globex = TenantId::new();
        store.create_entry(new_entry(acme, "REV-JE-2025-000001")).await.unwrap();

        assert!(store
            .find_tenant_reference(globex, "REV-JE-2025-000001")
            .await
            .unwrap()
            .is_none());
        let found = store
            .find_tenant_reference(acme, "REV-JE-2025-000001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.tenant_id, acme);
    }

    #[tokio::test]
    async fn test_failed_write_persists_nothing() {
        let store = InMemoryLedger::new();
        store.fail_writes(true);

        let result = store.create_entry(new_entry(TenantId::new(), "x")).await;

        assert!(matches!(result, Err(LedgerError::Persistence(_))));
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_list_entries_newest_first() {
        let store = InMemoryLedger::new();
        let tenant = TenantId::new();
        for reference in ["a", "b", "c"] {
            store.create_entry(new_entry(tenant, reference)).await.unwrap();
        }

        let page = store.list_entries(tenant, &PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].reference.as_deref(), Some("c"));

        let page = store.list_entries(tenant, &PageRequest::new(2, 2)).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].reference.as_deref(), Some("a"));
    }
}
