//! Fixed chart-of-accounts taxonomy used by the posting paths.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::EntrySide;

/// High-level account kind (determines normal balance side).
///
/// - Asset/Expense: balance = debit - credit (debit-normal)
/// - Liability/Equity/Revenue: balance = credit - debit (credit-normal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Cash, bank, receivables.
    Asset,
    /// Payables.
    Liability,
    /// Owner's equity.
    Equity,
    /// Sales and other income.
    Revenue,
    /// Costs and expenses.
    Expense,
}

impl AccountKind {
    /// Infers the kind from the leading digit of an account code.
    ///
    /// Codes outside the 1-5 ranges default to `Expense`.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.chars().next() {
            Some('1') => Self::Asset,
            Some('2') => Self::Liability,
            Some('3') => Self::Equity,
            Some('4') => Self::Revenue,
            _ => Self::Expense,
        }
    }

    /// Returns the side on which this kind of account normally carries its balance.
    #[must_use]
    pub const fn normal_side(self) -> EntrySide {
        match self {
            Self::Asset | Self::Expense => EntrySide::Debit,
            Self::Liability | Self::Equity | Self::Revenue => EntrySide::Credit,
        }
    }

    /// Calculates the signed balance from debit and credit totals.
    #[must_use]
    pub fn balance(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self.normal_side() {
            EntrySide::Debit => debit - credit,
            EntrySide::Credit => credit - debit,
        }
    }
}

/// Account codes the posting service knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountCode {
    /// 1000 Cash.
    Cash,
    /// 1100 Bank.
    Bank,
    /// 1200 Accounts receivable.
    AccountsReceivable,
    /// 2000 Accounts payable.
    AccountsPayable,
    /// 4000 Sales revenue.
    SalesRevenue,
    /// 4900 Other income.
    OtherIncome,
    /// 5000 Operating expenses.
    OperatingExpenses,
    /// 5100 Salaries expense.
    SalariesExpense,
    /// 5200 Rent expense.
    RentExpense,
    /// 5300 Utilities expense.
    UtilitiesExpense,
    /// 5900 Other expenses.
    OtherExpenses,
}

impl AccountCode {
    /// The default chart, in code order.
    pub const ALL: [Self; 11] = [
        Self::Cash,
        Self::Bank,
        Self::AccountsReceivable,
        Self::AccountsPayable,
        Self::SalesRevenue,
        Self::OtherIncome,
        Self::OperatingExpenses,
        Self::SalariesExpense,
        Self::RentExpense,
        Self::UtilitiesExpense,
        Self::OtherExpenses,
    ];

    /// Returns the numeric code as stored in the chart of accounts.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Cash => "1000",
            Self::Bank => "1100",
            Self::AccountsReceivable => "1200",
            Self::AccountsPayable => "2000",
            Self::SalesRevenue => "4000",
            Self::OtherIncome => "4900",
            Self::OperatingExpenses => "5000",
            Self::SalariesExpense => "5100",
            Self::RentExpense => "5200",
            Self::UtilitiesExpense => "5300",
            Self::OtherExpenses => "5900",
        }
    }

    /// Returns the display name used when seeding the chart.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Bank => "Bank",
            Self::AccountsReceivable => "Accounts Receivable",
            Self::AccountsPayable => "Accounts Payable",
            Self::SalesRevenue => "Sales Revenue",
            Self::OtherIncome => "Other Income",
            Self::OperatingExpenses => "Operating Expenses",
            Self::SalariesExpense => "Salaries Expense",
            Self::RentExpense => "Rent Expense",
            Self::UtilitiesExpense => "Utilities Expense",
            Self::OtherExpenses => "Other Expenses",
        }
    }

    /// Returns the account kind.
    #[must_use]
    pub fn kind(self) -> AccountKind {
        AccountKind::from_code(self.code())
    }
}

impl std::fmt::Display for AccountCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AccountCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|account| account.code() == s.trim())
            .ok_or_else(|| format!("Unknown account code: {s}"))
    }
}
