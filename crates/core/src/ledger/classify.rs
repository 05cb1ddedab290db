//! Expense category classification.
//!
//! Rules are evaluated top to bottom against the lower-cased category; the
//! first rule with a matching keyword wins. Order matters: "rent payroll"
//! lands on salaries.

use super::chart::AccountCode;

/// Ordered `(keywords, account)` rules.
pub const EXPENSE_RULES: &[(&[&str], AccountCode)] = &[
    (&["salario", "payroll", "sueldo"], AccountCode::SalariesExpense),
    (&["alquiler", "rent"], AccountCode::RentExpense),
    (
        &["servicio", "utility", "luz", "agua"],
        AccountCode::UtilitiesExpense,
    ),
];

/// Account used when no rule matches.
pub const DEFAULT_EXPENSE_ACCOUNT: AccountCode = AccountCode::OtherExpenses;

/// Maps an expense category to the account it is posted against.
#[must_use]
pub fn classify_expense(category: &str) -> AccountCode {
    let category = category.to_lowercase();
    EXPENSE_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| category.contains(k)))
        .map_or(DEFAULT_EXPENSE_ACCOUNT, |(_, account)| *account)
}
