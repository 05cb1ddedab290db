//! Journal entry numbering: `JE-<year>-<sequence>`.

/// Prefix of every entry number.
pub const ENTRY_NUMBER_PREFIX: &str = "JE";

/// Formats the number for the next entry of a tenant.
///
/// `existing` is the number of entries the tenant already has; the sequence
/// part is `existing + 1`, zero-padded to six digits.
#[must_use]
pub fn format_entry_number(year: i32, existing: u64) -> String {
    format!(
        "{ENTRY_NUMBER_PREFIX}-{year:04}-{:06}",
        existing.saturating_add(1)
    )
}

/// Parses an entry number into `(year, sequence)`.
#[must_use]
pub fn parse_entry_number(number: &str) -> Option<(i32, u64)> {
    let mut parts = number.split('-');
    if parts.next()? != ENTRY_NUMBER_PREFIX {
        return None;
    }
    let year = parts.next().filter(|y| y.len() == 4)?.parse().ok()?;
    let sequence = parts.next().filter(|s| s.len() >= 6)?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((year, sequence))
}
