//! Ledger posting service.
//!
//! Translates business events into balanced journal entries and reverses
//! posted entries on demand. Collaborators are injected at construction, so
//! the same service runs against `SeaORM` in production and
//! [`InMemoryLedger`](super::InMemoryLedger) in tests.
//!
//! Every public operation settles its own failures: callers get the entry
//! or `None`. Only `InvalidAmount` and `AccountNotFound` reach the caller
//! as errors.

use std::sync::Arc;

use chrono::NaiveDate;
use tally_shared::LedgerConfig;
use tally_shared::types::{
    ExpenseId, JournalEntryId, PageRequest, PageResponse, TenantId, TransactionId, UserId,
};
use tracing::{error, info, warn};

use super::balance::TrialBalance;
use super::error::LedgerError;
use super::gateway::{AccountResolver, BusinessRecordStore, JournalStore};
use super::posting;
use super::reversal::ReversalService;
use super::types::{
    EntryDraft, ExpenseInput, IncomeInput, InvoiceInput, JournalEntry, NewJournalEntry,
    NewJournalLine,
};
use super::validation::validate_lines;

/// Reason recorded on reversals triggered by deleting a transaction.
pub const TRANSACTION_DELETED_REASON: &str = "Transaction deleted";

/// Reason recorded on reversals triggered by deleting an expense.
pub const EXPENSE_DELETED_REASON: &str = "Expense deleted";

/// What happened to the accounting side of a record deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReversalStatus {
    /// The entry was reversed by this contra-entry.
    Reversed(JournalEntry),
    /// No journal entry references the record; nothing was reversed.
    NoEntryFound,
    /// The entry had already been reversed by this contra-entry.
    AlreadyReversed(JournalEntry),
    /// A journal entry exists but the reversal could not be posted.
    Failed,
}

/// Result of a delete-with-reversal operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    /// Accounting side of the deletion.
    pub reversal: ReversalStatus,
    /// Whether the business record was deleted.
    pub record_deleted: bool,
}

impl DeletionOutcome {
    /// Returns the reversal entry created by this deletion, if any.
    #[must_use]
    pub fn reversal_entry(&self) -> Option<&JournalEntry> {
        match &self.reversal {
            ReversalStatus::Reversed(entry) => Some(entry),
            _ => None,
        }
    }

    /// Returns true if the record was deleted without an accounting correction.
    #[must_use]
    pub fn reversal_skipped(&self) -> bool {
        !matches!(self.reversal, ReversalStatus::Reversed(_))
    }
}

/// Ledger posting service.
#[derive(Clone)]
pub struct PostingService {
    accounts: Arc<dyn AccountResolver>,
    journal: Arc<dyn JournalStore>,
    records: Arc<dyn BusinessRecordStore>,
    config: LedgerConfig,
}

impl std::fmt::Debug for PostingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostingService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PostingService {
    /// Creates a service from separate collaborators.
    #[must_use]
    pub fn new(
        accounts: Arc<dyn AccountResolver>,
        journal: Arc<dyn JournalStore>,
        records: Arc<dyn BusinessRecordStore>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            accounts,
            journal,
            records,
            config,
        }
    }

    /// Creates a service from one store implementing every collaborator.
    #[must_use]
    pub fn with_store<S>(store: Arc<S>, config: LedgerConfig) -> Self
    where
        S: AccountResolver + JournalStore + BusinessRecordStore + 'static,
    {
        Self::new(store.clone(), store.clone(), store, config)
    }

    /// Returns the ledger configuration.
    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Posts income received: debit Cash, credit Other Income.
    pub async fn post_income(
        &self,
        input: IncomeInput,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        let draft = posting::income(&input)?;
        self.post_entry(draft).await
    }

    /// Posts an expense paid: debit the classified expense account, credit Cash.
    pub async fn post_expense(
        &self,
        input: ExpenseInput,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        let draft = posting::expense(&input)?;
        self.post_entry(draft).await
    }

    /// Posts an issued invoice: debit Accounts Receivable, credit Sales Revenue.
    pub async fn post_invoice_issued(
        &self,
        input: InvoiceInput,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        let draft = posting::invoice_issued(&input)?;
        self.post_entry(draft).await
    }

    /// Posts a payment received on an invoice: debit Bank, credit Accounts Receivable.
    pub async fn post_payment_received(
        &self,
        input: InvoiceInput,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        let draft = posting::payment_received(&input)?;
        self.post_entry(draft).await
    }

    /// Resolves, validates and persists an arbitrary draft.
    ///
    /// Returns `Ok(None)` when the draft is unbalanced or the store fails.
    pub async fn post_entry(&self, draft: EntryDraft) -> Result<Option<JournalEntry>, LedgerError> {
        let result = match self.resolve(draft).await {
            Ok(entry) => self.commit(entry).await,
            Err(err) => Err(err),
        };
        Self::settle("post", result)
    }

    /// Reverses a posted entry with a mirrored contra-entry.
    ///
    /// The reversal carries the original entry's business date. Returns
    /// `None` if the entry does not exist or the reversal cannot be posted.
    pub async fn reverse(
        &self,
        entry_id: JournalEntryId,
        reason: &str,
        author: Option<UserId>,
    ) -> Option<JournalEntry> {
        let result = self.try_reverse(entry_id, reason, author).await;
        if let Err(LedgerError::ReversalTargetMissing(id)) = &result {
            info!(entry_id = %id, "Journal entry to reverse not found, nothing posted");
            return None;
        }
        Self::settle("reverse", result).unwrap_or_default()
    }

    /// Finds the entry whose reference equals `reference` exactly.
    pub async fn find_by_reference(&self, reference: &str) -> Option<JournalEntry> {
        match self.journal.find_by_reference(reference).await {
            Ok(found) => found,
            Err(err) => {
                error!(reference = %reference, error = %err, "Failed to look up journal entry");
                None
            }
        }
    }

    /// Reverses the entry posted for a transaction, then deletes the transaction.
    ///
    /// The transaction is deleted even when no entry references it.
    pub async fn delete_transaction_with_reversal(
        &self,
        id: TransactionId,
        author: Option<UserId>,
    ) -> DeletionOutcome {
        let reversal = self
            .reverse_by_reference(&id.to_string(), TRANSACTION_DELETED_REASON, author)
            .await;

        let record_deleted = match self.records.delete_transaction(id).await {
            Ok(deleted) => deleted,
            Err(err) => {
                error!(transaction_id = %id, error = %err, "Failed to delete transaction");
                false
            }
        };

        info!(
            transaction_id = %id,
            record_deleted,
            reversal_skipped = !matches!(reversal, ReversalStatus::Reversed(_)),
            "Transaction deleted"
        );
        DeletionOutcome {
            reversal,
            record_deleted,
        }
    }

    /// Reverses the entry posted for an expense, then deletes the expense.
    ///
    /// The expense is deleted even when no entry references it.
    pub async fn delete_expense_with_reversal(
        &self,
        id: ExpenseId,
        author: Option<UserId>,
    ) -> DeletionOutcome {
        let reversal = self
            .reverse_by_reference(&id.to_string(), EXPENSE_DELETED_REASON, author)
            .await;

        let record_deleted = match self.records.delete_expense(id).await {
            Ok(deleted) => deleted,
            Err(err) => {
                error!(expense_id = %id, error = %err, "Failed to delete expense");
                false
            }
        };

        info!(
            expense_id = %id,
            record_deleted,
            reversal_skipped = !matches!(reversal, ReversalStatus::Reversed(_)),
            "Expense deleted"
        );
        DeletionOutcome {
            reversal,
            record_deleted,
        }
    }

    /// Lists a page of the tenant's entries, newest first.
    pub async fn list_entries(
        &self,
        tenant_id: TenantId,
        page: Option<PageRequest>,
    ) -> Result<PageResponse<JournalEntry>, LedgerError> {
        let page = page.unwrap_or_else(|| PageRequest::new(1, self.config.default_page_size));
        let total = self.journal.count_entries(tenant_id).await?;
        let data = self.journal.list_entries(tenant_id, &page).await?;
        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Builds the tenant's trial balance, optionally up to a business date.
    pub async fn trial_balance(
        &self,
        tenant_id: TenantId,
        as_of: Option<NaiveDate>,
    ) -> Result<TrialBalance, LedgerError> {
        let accounts = self.accounts.list_accounts(tenant_id).await?;
        let lines = self.journal.lines_for_tenant(tenant_id, as_of).await?;
        Ok(TrialBalance::build(tenant_id, as_of, &accounts, &lines))
    }

    async fn resolve(&self, draft: EntryDraft) -> Result<NewJournalEntry, LedgerError> {
        let mut lines = Vec::with_capacity(draft.lines.len());

        for line in draft.lines {
            let code = line.account.code();
            let account_id = self
                .accounts
                .lookup_account_id(code, draft.tenant_id)
                .await?
                .ok_or_else(|| LedgerError::AccountNotFound {
                    code: code.to_string(),
                    tenant_id: draft.tenant_id,
                })?;

            lines.push(NewJournalLine {
                account_id,
                side: line.side,
                amount: line.amount,
                description: line.description,
            });
        }

        Ok(NewJournalEntry {
            tenant_id: draft.tenant_id,
            date: draft.date,
            description: draft.description,
            reference: draft.reference,
            author: draft.author,
            lines,
        })
    }

    async fn commit(&self, entry: NewJournalEntry) -> Result<JournalEntry, LedgerError> {
        validate_lines(&entry.lines, self.config.balance_tolerance)?;
        self.journal.create_entry(entry).await
    }

    async fn try_reverse(
        &self,
        entry_id: JournalEntryId,
        reason: &str,
        author: Option<UserId>,
    ) -> Result<JournalEntry, LedgerError> {
        let original = self
            .journal
            .find_entry(entry_id)
            .await?
            .ok_or(LedgerError::ReversalTargetMissing(entry_id))?;

        let reversal = ReversalService::create_reversing_entry(&original, reason, author)?;
        self.commit(reversal).await
    }

    async fn reverse_by_reference(
        &self,
        reference: &str,
        reason: &str,
        author: Option<UserId>,
    ) -> ReversalStatus {
        let Some(original) = self.find_by_reference(reference).await else {
            warn!(
                reference = %reference,
                "No journal entry references the deleted record, reversal skipped"
            );
            return ReversalStatus::NoEntryFound;
        };

        let reversal_reference = ReversalService::reversal_reference(&original.entry_number);
        let existing = match self
            .journal
            .find_tenant_reference(original.tenant_id, &reversal_reference)
            .await
        {
            Ok(existing) => existing,
            Err(err) => {
                error!(
                    entry_number = %original.entry_number,
                    error = %err,
                    "Failed to check for an existing reversal"
                );
                return ReversalStatus::Failed;
            }
        };
        if let Some(existing) = existing {
            warn!(
                tenant_id = %original.tenant_id,
                entry_number = %original.entry_number,
                reversal_number = %existing.entry_number,
                "Journal entry already reversed, reversal skipped"
            );
            return ReversalStatus::AlreadyReversed(existing);
        }

        match self.reverse(original.id, reason, author).await {
            Some(reversal) => ReversalStatus::Reversed(reversal),
            None => ReversalStatus::Failed,
        }
    }

    fn settle(
        operation: &'static str,
        result: Result<JournalEntry, LedgerError>,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        match result {
            Ok(entry) => {
                info!(
                    operation,
                    tenant_id = %entry.tenant_id,
                    entry_number = %entry.entry_number,
                    reference = ?entry.reference,
                    "Journal entry posted"
                );
                Ok(Some(entry))
            }
            Err(err) if err.is_recoverable() => {
                error!(
                    operation,
                    error = %err,
                    error_code = err.error_code(),
                    "Journal entry not posted"
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
