//! Database seeder for Tally development and testing.
//!
//! Seeds a demo tenant: its own copy of the default chart of accounts, a few
//! bank transactions and expenses, and the journal entries posted for them
//! and for one invoice. Running it twice does not post anything twice.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use tally_core::ledger::{
    ExpenseInput, IncomeInput, InvoiceInput, JournalStore, PostingService,
};
use tally_db::repositories::{CreateExpenseInput, CreateTransactionInput};
use tally_db::{AccountRepository, BusinessRecordRepository, JournalRepository};
use tally_shared::AppConfig;
use tally_shared::types::{Amount, TenantId};

/// Demo tenant ID (consistent for all seeds)
const DEMO_TENANT_ID: Uuid = Uuid::from_u128(1);

/// Demo bank transactions: (amount, description, date).
const DEMO_INCOME: &[(Decimal, &str, (i32, u32, u32))] = &[
    (dec!(3200.00), "Consulting retainer", (2025, 10, 3)),
    (dec!(480.50), "Workshop tickets", (2025, 10, 17)),
];

/// Demo expenses: (amount, description, category, date).
const DEMO_EXPENSES: &[(Decimal, &str, &str, (i32, u32, u32))] = &[
    (dec!(1500.00), "October office rent", "Rent", (2025, 10, 1)),
    (dec!(2100.00), "October payroll", "Payroll", (2025, 10, 28)),
    (dec!(87.35), "Electricity bill", "Electric Utility", (2025, 10, 12)),
    (dec!(42.00), "Printer paper", "Office supplies", (2025, 10, 20)),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=debug,seeder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = tally_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let tenant = TenantId::from_uuid(DEMO_TENANT_ID);
    let service = tally_db::posting_service(&db, config.ledger.clone());

    AccountRepository::new(db.clone())
        .seed_default_chart(Some(tenant))
        .await?;

    let existing = JournalRepository::new(db.clone())
        .count_entries(tenant)
        .await?;
    if existing > 0 {
        info!(tenant_id = %tenant, existing, "Demo tenant already has entries, skipping");
        return Ok(());
    }

    let records = BusinessRecordRepository::new(db.clone());
    seed_income(&service, &records, tenant).await?;
    seed_expenses(&service, &records, tenant).await?;
    seed_invoice(&service, tenant).await?;

    let trial = service.trial_balance(tenant, None).await?;
    info!(
        tenant_id = %tenant,
        total_debit = %trial.total_debit,
        total_credit = %trial.total_credit,
        balanced = trial.is_balanced(),
        "Seeding complete"
    );

    Ok(())
}

fn date((y, m, d): (i32, u32, u32)) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).with_context(|| format!("invalid date {y}-{m}-{d}"))
}

/// Seeds bank transactions and posts them as income.
async fn seed_income(
    service: &PostingService,
    records: &BusinessRecordRepository,
    tenant: TenantId,
) -> anyhow::Result<()> {
    for &(amount, description, on) in DEMO_INCOME {
        let date = date(on)?;
        let transaction = records
            .create_transaction(CreateTransactionInput {
                tenant_id: tenant,
                amount: Amount::new(amount)?,
                description: description.to_string(),
                date,
            })
            .await?;

        let posted = service
            .post_income(IncomeInput {
                tenant_id: tenant,
                amount,
                description: description.to_string(),
                date,
                reference: Some(transaction.id.to_string()),
                author: None,
            })
            .await?;
        report(posted.as_ref().map(|e| e.entry_number.as_str()), description);
    }
    Ok(())
}

/// Seeds expenses and posts them against their classified accounts.
async fn seed_expenses(
    service: &PostingService,
    records: &BusinessRecordRepository,
    tenant: TenantId,
) -> anyhow::Result<()> {
    for &(amount, description, category, on) in DEMO_EXPENSES {
        let date = date(on)?;
        let expense = records
            .create_expense(CreateExpenseInput {
                tenant_id: tenant,
                amount: Amount::new(amount)?,
                description: description.to_string(),
                category: category.to_string(),
                date,
            })
            .await?;

        let posted = service
            .post_expense(ExpenseInput {
                tenant_id: tenant,
                amount,
                description: description.to_string(),
                category: category.to_string(),
                date,
                reference: Some(expense.id.to_string()),
                author: None,
            })
            .await?;
        report(posted.as_ref().map(|e| e.entry_number.as_str()), description);
    }
    Ok(())
}

/// Posts one invoice and its payment.
async fn seed_invoice(service: &PostingService, tenant: TenantId) -> anyhow::Result<()> {
    let invoice = InvoiceInput {
        tenant_id: tenant,
        amount: dec!(2400.00),
        invoice_number: "INV-0001".to_string(),
        customer_name: "Globex Corporation".to_string(),
        date: date((2025, 10, 5))?,
        author: None,
    };

    let issued = service.post_invoice_issued(invoice.clone()).await?;
    report(issued.as_ref().map(|e| e.entry_number.as_str()), "INV-0001 issued");

    let payment = InvoiceInput {
        date: date((2025, 10, 30))?,
        ..invoice
    };
    let paid = service.post_payment_received(payment).await?;
    report(paid.as_ref().map(|e| e.entry_number.as_str()), "INV-0001 paid");

    Ok(())
}

fn report(entry_number: Option<&str>, what: &str) {
    match entry_number {
        Some(number) => info!(entry_number = %number, "Posted {what}"),
        None => warn!("Nothing posted for {what}"),
    }
}
