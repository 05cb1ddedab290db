//! Posting-line builders for business events.
//!
//! Each builder turns one business event into a two-line draft: one pure
//! debit line and one pure credit line of the same amount.

use tally_shared::types::Amount;

use super::chart::AccountCode;
use super::classify::classify_expense;
use super::error::LedgerError;
use super::types::{EntryDraft, ExpenseInput, IncomeInput, InvoiceInput, PostingLine};

/// Suffix distinguishing a payment's reference from its invoice's.
pub const PAYMENT_REFERENCE_SUFFIX: &str = "-PAYMENT";

/// Income received: debit Cash, credit Other Income.
///
/// # Errors
///
/// Returns `InvalidAmount` if the amount is not positive.
pub fn income(input: &IncomeInput) -> Result<EntryDraft, LedgerError> {
    let amount = Amount::new(input.amount)?;
    let description = format!("Income: {}", input.description);

    Ok(EntryDraft {
        tenant_id: input.tenant_id,
        date: input.date,
        lines: vec![
            PostingLine::debit(AccountCode::Cash, amount, description.clone()),
            PostingLine::credit(AccountCode::OtherIncome, amount, description.clone()),
        ],
        description,
        reference: input.reference.clone(),
        author: input.author,
    })
}

/// Expense paid: debit the classified expense account, credit Cash.
///
/// # Errors
///
/// Returns `InvalidAmount` if the amount is not positive.
pub fn expense(input: &ExpenseInput) -> Result<EntryDraft, LedgerError> {
    let amount = Amount::new(input.amount)?;
    let description = format!("Expense: {}", input.description);
    let expense_account = classify_expense(&input.category);

    Ok(EntryDraft {
        tenant_id: input.tenant_id,
        date: input.date,
        lines: vec![
            PostingLine::debit(expense_account, amount, description.clone()),
            PostingLine::credit(AccountCode::Cash, amount, description.clone()),
        ],
        description,
        reference: input.reference.clone(),
        author: input.author,
    })
}

/// Invoice issued: debit Accounts Receivable, credit Sales Revenue.
///
/// The reference is the invoice number itself.
///
/// # Errors
///
/// Returns `InvalidAmount` if the amount is not positive.
pub fn invoice_issued(input: &InvoiceInput) -> Result<EntryDraft, LedgerError> {
    let amount = Amount::new(input.amount)?;
    let description = format!(
        "Invoice {} issued to {}",
        input.invoice_number, input.customer_name
    );

    Ok(EntryDraft {
        tenant_id: input.tenant_id,
        date: input.date,
        lines: vec![
            PostingLine::debit(AccountCode::AccountsReceivable, amount, description.clone()),
            PostingLine::credit(AccountCode::SalesRevenue, amount, description.clone()),
        ],
        description,
        reference: Some(input.invoice_number.clone()),
        author: input.author,
    })
}

/// Payment received on an invoice: debit Bank, credit Accounts Receivable.
///
/// The reference is `<invoice number>-PAYMENT` so the payment entry can be
/// found independently of the issuance entry.
///
/// # Errors
///
/// Returns `InvalidAmount` if the amount is not positive.
pub fn payment_received(input: &InvoiceInput) -> Result<EntryDraft, LedgerError> {
    let amount = Amount::new(input.amount)?;
    let description = format!(
        "Payment received for invoice {} from {}",
        input.invoice_number, input.customer_name
    );

    Ok(EntryDraft {
        tenant_id: input.tenant_id,
        date: input.date,
        lines: vec![
            PostingLine::debit(AccountCode::Bank, amount, description.clone()),
            PostingLine::credit(AccountCode::AccountsReceivable, amount, description.clone()),
        ],
        description,
        reference: Some(payment_reference(&input.invoice_number)),
        author: input.author,
    })
}

/// Builds the reference used for a payment on `invoice_number`.
#[must_use]
pub fn payment_reference(invoice_number: &str) -> String {
    format!("{invoice_number}{PAYMENT_REFERENCE_SUFFIX}")
}
