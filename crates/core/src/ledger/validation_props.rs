//! Property-based tests for balance validation, entry numbering and
//! expense classification.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, Amount};

use super::chart::{AccountCode, AccountKind};
use super::classify::classify_expense;
use super::error::LedgerError;
use super::numbering::{format_entry_number, parse_entry_number};
use super::types::{EntrySide, NewJournalLine};
use super::validation::{DEFAULT_BALANCE_TOLERANCE, validate_lines};

/// Strategy to generate positive amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn make_line(side: EntrySide, amount: Decimal) -> NewJournalLine {
    NewJournalLine {
        account_id: AccountId::new(),
        side,
        amount: Amount::new(amount).unwrap(),
        description: String::new(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any set of debits balanced by a single credit of their sum passes.
    #[test]
    fn prop_balanced_lines_accepted(
        debits in prop::collection::vec(positive_amount(), 1..8),
    ) {
        let total: Decimal = debits.iter().sum();
        let mut lines: Vec<_> = debits
            .iter()
            .map(|amount| make_line(EntrySide::Debit, *amount))
            .collect();
        lines.push(make_line(EntrySide::Credit, total));

        let totals = validate_lines(&lines, DEFAULT_BALANCE_TOLERANCE).unwrap();
        prop_assert_eq!(totals.total_debit, total);
        prop_assert_eq!(totals.total_credit, total);
    }

    /// Differences up to one cent are tolerated.
    #[test]
    fn prop_difference_within_tolerance_accepted(
        amount in positive_amount(),
        delta_cents in 0i64..=1,
    ) {
        let lines = vec![
            make_line(EntrySide::Debit, amount),
            make_line(EntrySide::Credit, amount + Decimal::new(delta_cents, 2)),
        ];

        prop_assert!(validate_lines(&lines, DEFAULT_BALANCE_TOLERANCE).is_ok());
    }

    /// Differences above one cent are refused, never corrected.
    #[test]
    fn prop_difference_above_tolerance_rejected(
        amount in positive_amount(),
        delta_cents in 2i64..100_000,
        credit_heavy in any::<bool>(),
    ) {
        let larger = amount + Decimal::new(delta_cents, 2);
        let (debit, credit) = if credit_heavy { (amount, larger) } else { (larger, amount) };
        let lines = vec![
            make_line(EntrySide::Debit, debit),
            make_line(EntrySide::Credit, credit),
        ];

        let result = validate_lines(&lines, DEFAULT_BALANCE_TOLERANCE);
        prop_assert!(
            matches!(
                result,
                Err(LedgerError::BalanceViolation { debit: d, credit: c }) if d == debit && c == credit
            ),
            "expected balance violation, got {:?}",
            result
        );
    }

    /// Entry numbers have the `JE-YYYY-NNNNNN` shape and parse back.
    #[test]
    fn prop_entry_number_format(
        year in 1000i32..=9999,
        existing in 0u64..999_999,
    ) {
        let number = format_entry_number(year, existing);

        prop_assert_eq!(number.len(), 14);
        prop_assert!(number.starts_with("JE-"));
        prop_assert!(number[3..7].chars().all(|c| c.is_ascii_digit()));
        prop_assert_eq!(&number[7..8], "-");
        prop_assert!(number[8..].chars().all(|c| c.is_ascii_digit()));
        prop_assert_eq!(parse_entry_number(&number), Some((year, existing + 1)));
    }

    /// Within a year, later entries sort after earlier ones.
    #[test]
    fn prop_entry_numbers_strictly_increase(
        year in 2000i32..2100,
        existing in 0u64..999_998,
    ) {
        let current = format_entry_number(year, existing);
        let next = format_entry_number(year, existing + 1);
        prop_assert!(next > current);
    }

    /// Classification ignores case.
    #[test]
    fn prop_classification_is_case_insensitive(category in "[a-zA-Z ]{0,30}") {
        prop_assert_eq!(
            classify_expense(&category.to_uppercase()),
            classify_expense(&category.to_lowercase())
        );
    }

    /// Every category lands on an expense account.
    #[test]
    fn prop_classification_targets_expense_accounts(category in ".{0,40}") {
        prop_assert_eq!(classify_expense(&category).kind(), AccountKind::Expense);
    }

    /// Categories without letters fall through to Other Expenses.
    #[test]
    fn prop_unmatched_category_uses_default(category in "[0-9 #/-]{0,20}") {
        prop_assert_eq!(classify_expense(&category), AccountCode::OtherExpenses);
    }
}
