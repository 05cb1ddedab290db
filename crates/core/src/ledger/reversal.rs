//! Reversal (contra-entry) construction for posted journal entries.
//!
//! Posted entries are never edited or removed. Undoing one means posting a
//! mirror image: every line with its debit and credit swapped.

use tally_shared::types::UserId;

use super::error::LedgerError;
use super::types::{JournalEntry, NewJournalEntry, NewJournalLine};

/// Prefix of reversal entry and line descriptions.
pub const REVERSAL_PREFIX: &str = "REVERSAL: ";

/// Prefix of a reversal entry's reference.
pub const REVERSAL_REFERENCE_PREFIX: &str = "REV-";

/// Stateless service for creating reversing entries.
pub struct ReversalService;

impl ReversalService {
    /// Create a reversing entry by swapping debits and credits.
    ///
    /// For each original line:
    /// - Debits become credits
    /// - Credits become debits
    /// - Account and amount are preserved
    /// - Description is prefixed with "REVERSAL: "
    ///
    /// The reversing entry keeps the original business date so period
    /// reports show the reversal in the period of the entry it cancels.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLine` if a stored line has no single debit or credit side.
    pub fn create_reversing_entry(
        original: &JournalEntry,
        reason: &str,
        author: Option<UserId>,
    ) -> Result<NewJournalEntry, LedgerError> {
        let lines = original
            .lines
            .iter()
            .map(|line| {
                let (side, amount) = line.posting()?;
                Ok(NewJournalLine {
                    account_id: line.account_id,
                    side: side.opposite(),
                    amount,
                    description: format!("{REVERSAL_PREFIX}{}", line.description),
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        Ok(NewJournalEntry {
            tenant_id: original.tenant_id,
            date: original.date,
            description: format!("{REVERSAL_PREFIX}{} - {reason}", original.description),
            reference: Some(Self::reversal_reference(&original.entry_number)),
            author,
            lines,
        })
    }

    /// Reference given to the reversal of entry `entry_number`.
    #[must_use]
    pub fn reversal_reference(entry_number: &str) -> String {
        format!("{REVERSAL_REFERENCE_PREFIX}{entry_number}")
    }
}
