//! Trial balance calculation.
//!
//! Aggregates posted lines per account. Because every posted entry is
//! balanced, total debits equal total credits across the whole report.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, TenantId};

use super::chart::AccountKind;
use super::gateway::AccountInfo;
use super::types::JournalLine;

/// One account's totals in a trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// The account ID.
    pub account_id: AccountId,
    /// Account code, if the account is still in the chart.
    pub code: Option<String>,
    /// Account name, if the account is still in the chart.
    pub name: Option<String>,
    /// Account kind (debit-normal when unknown).
    pub kind: AccountKind,
    /// Total debit amount.
    pub debit_total: Decimal,
    /// Total credit amount.
    pub credit_total: Decimal,
    /// Net balance on the account's normal side.
    pub balance: Decimal,
}

/// Trial balance of a tenant at a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Tenant the report belongs to.
    pub tenant_id: TenantId,
    /// Last business date included (all dates when `None`).
    pub as_of: Option<NaiveDate>,
    /// Rows ordered by account code; unknown accounts last.
    pub rows: Vec<TrialBalanceRow>,
    /// Sum of all debits.
    pub total_debit: Decimal,
    /// Sum of all credits.
    pub total_credit: Decimal,
}

impl TrialBalance {
    /// Builds a trial balance from posted lines and the tenant's chart.
    #[must_use]
    pub fn build(
        tenant_id: TenantId,
        as_of: Option<NaiveDate>,
        accounts: &[AccountInfo],
        lines: &[JournalLine],
    ) -> Self {
        let chart: HashMap<AccountId, &AccountInfo> =
            accounts.iter().map(|a| (a.id, a)).collect();

        let mut totals: HashMap<AccountId, (Decimal, Decimal)> = HashMap::new();
        for line in lines {
            let entry = totals.entry(line.account_id).or_default();
            entry.0 += line.debit;
            entry.1 += line.credit;
        }

        let mut rows: Vec<TrialBalanceRow> = totals
            .into_iter()
            .map(|(account_id, (debit_total, credit_total))| {
                let info = chart.get(&account_id);
                let kind = info.map_or(AccountKind::Expense, |a| AccountKind::from_code(&a.code));
                TrialBalanceRow {
                    account_id,
                    code: info.map(|a| a.code.clone()),
                    name: info.map(|a| a.name.clone()),
                    kind,
                    debit_total,
                    credit_total,
                    balance: kind.balance(debit_total, credit_total),
                }
            })
            .collect();

        rows.sort_by(|a, b| match (&a.code, &b.code) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.account_id.0.cmp(&b.account_id.0),
        });

        let total_debit = rows.iter().map(|r| r.debit_total).sum();
        let total_credit = rows.iter().map(|r| r.credit_total).sum();

        Self {
            tenant_id,
            as_of,
            rows,
            total_debit,
            total_credit,
        }
    }

    /// Returns true if total debits equal total credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_credit
    }

    /// Finds the row for an account code.
    #[must_use]
    pub fn row(&self, code: &str) -> Option<&TrialBalanceRow> {
        self.rows.iter().find(|r| r.code.as_deref() == Some(code))
    }
}
