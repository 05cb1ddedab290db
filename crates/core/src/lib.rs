//! Core ledger posting logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached only through the collaborator traits in
//! [`ledger::gateway`], which the `tally-db` crate implements with `SeaORM`.
//!
//! # Modules
//!
//! - `ledger` - Double-entry journal posting, reversal, and trial balance

pub mod ledger;
