//! `SeaORM` entity definitions.

pub mod chart_of_accounts;
pub mod expenses;
pub mod journal_entries;
pub mod journal_lines;
pub mod transactions;
