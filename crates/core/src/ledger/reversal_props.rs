//! Property-based tests for reversal construction.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, JournalEntryId, JournalLineId, TenantId};

use super::reversal::ReversalService;
use super::types::{EntryStatus, JournalEntry, JournalLine};
use super::validation::{DEFAULT_BALANCE_TOLERANCE, validate_lines};

/// Strategy to generate positive amounts (0.01 to 100,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate business dates across several years.
fn business_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Builds a posted entry: one debit line per amount, one balancing credit.
fn posted_entry(debits: &[Decimal], date: NaiveDate) -> JournalEntry {
    let id = JournalEntryId::new();
    let total: Decimal = debits.iter().sum();
    let columns = debits
        .iter()
        .map(|d| (*d, Decimal::ZERO))
        .chain(std::iter::once((Decimal::ZERO, total)));

    JournalEntry {
        id,
        tenant_id: TenantId::new(),
        entry_number: "JE-2025-000001".to_string(),
        date,
        description: "Expense: Supplies".to_string(),
        reference: None,
        status: EntryStatus::Posted,
        author: None,
        created_at: Utc::now(),
        lines: columns
            .zip(1..)
            .map(|((debit, credit), line_number)| JournalLine {
                id: JournalLineId::new(),
                entry_id: id,
                account_id: AccountId::new(),
                debit,
                credit,
                description: format!("Line {line_number}"),
                line_number,
            })
            .collect(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every reversal line mirrors its original line.
    #[test]
    fn prop_reversal_swaps_each_line(
        debits in prop::collection::vec(positive_amount(), 1..6),
        date in business_date(),
    ) {
        let original = posted_entry(&debits, date);
        let reversal = ReversalService::create_reversing_entry(&original, "Error", None).unwrap();

        prop_assert_eq!(reversal.lines.len(), original.lines.len());
        for (before, after) in original.lines.iter().zip(&reversal.lines) {
            prop_assert_eq!(after.account_id, before.account_id);
            prop_assert_eq!(after.debit(), before.credit);
            prop_assert_eq!(after.credit(), before.debit);
            prop_assert!(after.description.starts_with("REVERSAL: "));
        }
    }

    /// Reversals of balanced entries are balanced.
    #[test]
    fn prop_reversal_preserves_balance(
        debits in prop::collection::vec(positive_amount(), 1..6),
        date in business_date(),
    ) {
        let original = posted_entry(&debits, date);
        let reversal = ReversalService::create_reversing_entry(&original, "Error", None).unwrap();

        let totals = validate_lines(&reversal.lines, DEFAULT_BALANCE_TOLERANCE).unwrap();
        prop_assert_eq!(totals.total_debit, original.totals().total_credit);
        prop_assert_eq!(totals.total_credit, original.totals().total_debit);
    }

    /// An entry plus its reversal leaves every account at zero.
    #[test]
    fn prop_entry_and_reversal_net_to_zero(
        debits in prop::collection::vec(positive_amount(), 1..6),
    ) {
        let original = posted_entry(&debits, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let reversal = ReversalService::create_reversing_entry(&original, "Error", None).unwrap();

        let mut net: HashMap<AccountId, Decimal> = HashMap::new();
        for line in &original.lines {
            *net.entry(line.account_id).or_default() += line.debit - line.credit;
        }
        for line in &reversal.lines {
            *net.entry(line.account_id).or_default() += line.debit() - line.credit();
        }
        prop_assert!(net.values().all(Decimal::is_zero));
    }

    /// The reversal is dated on the original business date.
    #[test]
    fn prop_reversal_keeps_original_date(
        debits in prop::collection::vec(positive_amount(), 1..3),
        date in business_date(),
        reason in "[A-Za-z ]{1,20}",
    ) {
        let original = posted_entry(&debits, date);
        let reversal = ReversalService::create_reversing_entry(&original, &reason, None).unwrap();

        prop_assert_eq!(reversal.date, date);
        let expected_suffix = format!(" - {reason}");
        prop_assert!(reversal.description.ends_with(&expected_suffix));
    }
}
