//! Ledger domain types for journal entry posting.
//!
//! A posting starts as an [`EntryDraft`] whose lines name account codes,
//! becomes a [`NewJournalEntry`] once every code is resolved for the tenant,
//! and comes back from the store as a numbered [`JournalEntry`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{
    AccountId, Amount, JournalEntryId, JournalLineId, TenantId, UserId,
};

use super::chart::AccountCode;
use super::error::LedgerError;

/// Side of a journal line: either Debit or Credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    /// Debit side.
    Debit,
    /// Credit side.
    Credit,
}

impl EntrySide {
    /// Returns the other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }

    /// Splits an amount into `(debit, credit)` columns.
    #[must_use]
    pub fn columns(self, amount: Amount) -> (Decimal, Decimal) {
        match self {
            Self::Debit => (amount.value(), Decimal::ZERO),
            Self::Credit => (Decimal::ZERO, amount.value()),
        }
    }
}

/// Journal entry status. Entries written by this service are always posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryStatus {
    /// Entry is part of the ledger.
    Posted,
}

impl EntryStatus {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Posted => "POSTED",
        }
    }
}

impl std::str::FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POSTED" => Ok(Self::Posted),
            other => Err(format!("Unknown entry status: {other}")),
        }
    }
}

/// One line of a draft, naming the account by code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingLine {
    /// Account to post to.
    pub account: AccountCode,
    /// Debit or credit.
    pub side: EntrySide,
    /// Positive amount.
    pub amount: Amount,
    /// Line description.
    pub description: String,
}

impl PostingLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account: AccountCode, amount: Amount, description: impl Into<String>) -> Self {
        Self {
            account,
            side: EntrySide::Debit,
            amount,
            description: description.into(),
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account: AccountCode, amount: Amount, description: impl Into<String>) -> Self {
        Self {
            account,
            side: EntrySide::Credit,
            amount,
            description: description.into(),
        }
    }
}

/// A journal entry before its account codes are resolved.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    /// Tenant owning the entry.
    pub tenant_id: TenantId,
    /// Business date.
    pub date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Lookup key back to the originating business record.
    pub reference: Option<String>,
    /// User posting the entry.
    pub author: Option<UserId>,
    /// Lines in posting order.
    pub lines: Vec<PostingLine>,
}

/// A resolved line ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournalLine {
    /// Resolved account.
    pub account_id: AccountId,
    /// Debit or credit.
    pub side: EntrySide,
    /// Positive amount.
    pub amount: Amount,
    /// Line description.
    pub description: String,
}

impl NewJournalLine {
    /// Debit column value (zero for credit lines).
    #[must_use]
    pub fn debit(&self) -> Decimal {
        self.side.columns(self.amount).0
    }

    /// Credit column value (zero for debit lines).
    #[must_use]
    pub fn credit(&self) -> Decimal {
        self.side.columns(self.amount).1
    }
}

/// A resolved journal entry handed to the store.
///
/// The store assigns the id, the entry number, line ordinals and the
/// creation timestamp in the same atomic write.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    /// Tenant owning the entry.
    pub tenant_id: TenantId,
    /// Business date.
    pub date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Lookup key back to the originating business record.
    pub reference: Option<String>,
    /// User posting the entry.
    pub author: Option<UserId>,
    /// Lines in posting order.
    pub lines: Vec<NewJournalLine>,
}

/// A persisted journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Line id.
    pub id: JournalLineId,
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// Account posted to.
    pub account_id: AccountId,
    /// Debit amount (0 if credit).
    pub debit: Decimal,
    /// Credit amount (0 if debit).
    pub credit: Decimal,
    /// Line description.
    pub description: String,
    /// 1-based position within the entry.
    pub line_number: u32,
}

impl JournalLine {
    /// Recovers the side and amount of a stored line.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidLine` unless exactly one column is positive.
    pub fn posting(&self) -> Result<(EntrySide, Amount), LedgerError> {
        let side = match (self.debit.is_zero(), self.credit.is_zero()) {
            (false, true) => (EntrySide::Debit, self.debit),
            (true, false) => (EntrySide::Credit, self.credit),
            _ => return Err(LedgerError::InvalidLine(self.id)),
        };
        let amount = Amount::new(side.1).map_err(|_| LedgerError::InvalidLine(self.id))?;
        Ok((side.0, amount))
    }
}

/// A persisted journal entry with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry id.
    pub id: JournalEntryId,
    /// Tenant owning the entry.
    pub tenant_id: TenantId,
    /// Human-readable number, `JE-<year>-<sequence>`.
    pub entry_number: String,
    /// Business date.
    pub date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Lookup key back to the originating business record.
    pub reference: Option<String>,
    /// Entry status.
    pub status: EntryStatus,
    /// User who posted the entry.
    pub author: Option<UserId>,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
    /// Lines ordered by `line_number`.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Sums the debit and credit columns.
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        EntryTotals::new(
            self.lines.iter().map(|l| l.debit).sum(),
            self.lines.iter().map(|l| l.credit).sum(),
        )
    }
}

/// Entry totals for validation and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTotals {
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
}

impl EntryTotals {
    /// Creates new totals from debit and credit sums.
    #[must_use]
    pub const fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }

    /// Returns true if the difference is within `tolerance`.
    #[must_use]
    pub fn is_balanced_within(&self, tolerance: Decimal) -> bool {
        self.difference().abs() <= tolerance
    }
}

/// Income received (cash in, other income).
#[derive(Debug, Clone)]
pub struct IncomeInput {
    /// Tenant posting the income.
    pub tenant_id: TenantId,
    /// Amount received; must be positive.
    pub amount: Decimal,
    /// Free-text description.
    pub description: String,
    /// Business date.
    pub date: NaiveDate,
    /// Optional reference, usually the transaction id.
    pub reference: Option<String>,
    /// User posting the entry.
    pub author: Option<UserId>,
}

/// Expense paid in cash.
#[derive(Debug, Clone)]
pub struct ExpenseInput {
    /// Tenant posting the expense.
    pub tenant_id: TenantId,
    /// Amount paid; must be positive.
    pub amount: Decimal,
    /// Free-text description.
    pub description: String,
    /// Category used to pick the expense account.
    pub category: String,
    /// Business date.
    pub date: NaiveDate,
    /// Optional reference, usually the expense id.
    pub reference: Option<String>,
    /// User posting the entry.
    pub author: Option<UserId>,
}

/// Invoice event: issuance or payment received.
#[derive(Debug, Clone)]
pub struct InvoiceInput {
    /// Tenant issuing the invoice.
    pub tenant_id: TenantId,
    /// Invoice total or payment amount; must be positive.
    pub amount: Decimal,
    /// Invoice number, used as the lookup reference.
    pub invoice_number: String,
    /// Customer display name.
    pub customer_name: String,
    /// Business date.
    pub date: NaiveDate,
    /// User posting the entry.
    pub author: Option<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(debit: Decimal, credit: Decimal) -> JournalLine {
        JournalLine {
            id: JournalLineId::new(),
            entry_id: JournalEntryId::new(),
            account_id: AccountId::new(),
            debit,
            credit,
            description: String::new(),
            line_number: 1,
        }
    }

    #[test]
    fn test_side_columns() {
        let amount = Amount::new(dec!(12.50)).unwrap();
        assert_eq!(EntrySide::Debit.columns(amount), (dec!(12.50), Decimal::ZERO));
        assert_eq!(EntrySide::Credit.columns(amount), (Decimal::ZERO, dec!(12.50)));
        assert_eq!(EntrySide::Debit.opposite(), EntrySide::Credit);
    }

    #[test]
    fn test_journal_line_posting() {
        let (side, amount) = line(dec!(10), Decimal::ZERO).posting().unwrap();
        assert_eq!(side, EntrySide::Debit);
        assert_eq!(amount.value(), dec!(10));

        let (side, _) = line(Decimal::ZERO, dec!(3)).posting().unwrap();
        assert_eq!(side, EntrySide::Credit);
    }

    #[test]
    fn test_journal_line_posting_rejects_ambiguous_lines() {
        assert!(matches!(
            line(dec!(1), dec!(1)).posting(),
            Err(LedgerError::InvalidLine(_))
        ));
        assert!(matches!(
            line(Decimal::ZERO, Decimal::ZERO).posting(),
            Err(LedgerError::InvalidLine(_))
        ));
        assert!(matches!(
            line(dec!(-5), Decimal::ZERO).posting(),
            Err(LedgerError::InvalidLine(_))
        ));
    }

    #[test]
    fn test_entry_totals() {
        let totals = EntryTotals::new(dec!(100.00), dec!(99.995));
        assert!(totals.is_balanced_within(dec!(0.01)));
        assert_eq!(totals.difference(), dec!(0.005));

        let totals = EntryTotals::new(dec!(100.00), dec!(99.98));
        assert!(!totals.is_balanced_within(dec!(0.01)));
    }

    #[test]
    fn test_status_string() {
        assert_eq!(EntryStatus::Posted.as_str(), "POSTED");
        assert_eq!("POSTED".parse::<EntryStatus>(), Ok(EntryStatus::Posted));
        assert!("DRAFT".parse::<EntryStatus>().is_err());
    }
}
