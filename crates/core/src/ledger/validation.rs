//! Business rule validation for journal lines.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryTotals, NewJournalLine};

/// Default tolerance between total debits and total credits (0.01).
pub const DEFAULT_BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Validates that a set of journal lines is balanced.
///
/// The entry is rejected, never corrected.
///
/// # Errors
///
/// Returns `EmptyEntry` for an empty line set and `BalanceViolation` when
/// `|debit - credit|` exceeds `tolerance`.
pub fn validate_lines(
    lines: &[NewJournalLine],
    tolerance: Decimal,
) -> Result<EntryTotals, LedgerError> {
    if lines.is_empty() {
        return Err(LedgerError::EmptyEntry);
    }

    let totals = EntryTotals::new(
        lines.iter().map(NewJournalLine::debit).sum(),
        lines.iter().map(NewJournalLine::credit).sum(),
    );

    if !totals.is_balanced_within(tolerance) {
        return Err(LedgerError::BalanceViolation {
            debit: totals.total_debit,
            credit: totals.total_credit,
        });
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::EntrySide;
    use rust_decimal_macros::dec;
    use tally_shared::types::{AccountId, Amount};

    fn make_line(side: EntrySide, amount: Decimal) -> NewJournalLine {
        NewJournalLine {
            account_id: AccountId::new(),
            side,
            amount: Amount::new(amount).unwrap(),
            description: String::new(),
        }
    }

    #[test]
    fn test_default_tolerance_is_one_cent() {
        assert_eq!(DEFAULT_BALANCE_TOLERANCE, dec!(0.01));
    }

    #[test]
    fn test_balanced_lines() {
        let lines = vec![
            make_line(EntrySide::Debit, dec!(100.00)),
            make_line(EntrySide::Credit, dec!(100.00)),
        ];
        let totals = validate_lines(&lines, DEFAULT_BALANCE_TOLERANCE).unwrap();
        assert_eq!(totals.total_debit, dec!(100.00));
        assert_eq!(totals.total_credit, dec!(100.00));
    }

    #[test]
    fn test_unbalanced_lines() {
        let lines = vec![
            make_line(EntrySide::Debit, dec!(100.00)),
            make_line(EntrySide::Credit, dec!(50.00)),
        ];
        assert!(matches!(
            validate_lines(&lines, DEFAULT_BALANCE_TOLERANCE),
            Err(LedgerError::BalanceViolation { .. })
        ));
    }

    #[test]
    fn test_difference_at_tolerance_is_accepted() {
        let lines = vec![
            make_line(EntrySide::Debit, dec!(100.01)),
            make_line(EntrySide::Credit, dec!(100.00)),
        ];
        assert!(validate_lines(&lines, DEFAULT_BALANCE_TOLERANCE).is_ok());

        let lines = vec![
            make_line(EntrySide::Debit, dec!(100.02)),
            make_line(EntrySide::Credit, dec!(100.00)),
        ];
        assert!(validate_lines(&lines, DEFAULT_BALANCE_TOLERANCE).is_err());
    }

    #[test]
    fn test_no_lines() {
        assert!(matches!(
            validate_lines(&[], DEFAULT_BALANCE_TOLERANCE),
            Err(LedgerError::EmptyEntry)
        ));
    }

    #[test]
    fn test_single_sided_lines_are_unbalanced() {
        let lines = vec![
            make_line(EntrySide::Debit, dec!(100.00)),
            make_line(EntrySide::Debit, dec!(50.00)),
        ];
        assert!(matches!(
            validate_lines(&lines, DEFAULT_BALANCE_TOLERANCE),
            Err(LedgerError::BalanceViolation { .. })
        ));
    }
}
