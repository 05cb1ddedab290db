//! Property-based tests for PostingService against the in-memory store.

use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::LedgerConfig;
use tally_shared::types::TenantId;

use super::memory::InMemoryLedger;
use super::numbering::parse_entry_number;
use super::service::PostingService;
use super::types::{ExpenseInput, IncomeInput, InvoiceInput};

/// Strategy to generate positive amounts (0.01 to 100,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate expense categories, known and unknown.
fn category() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Payroll".to_string()),
        Just("Office Rent".to_string()),
        Just("Servicio de agua".to_string()),
        Just("Travel".to_string()),
        "[a-z ]{0,12}",
    ]
}

/// One business event to post.
#[derive(Debug, Clone)]
enum Event {
    Income(Decimal),
    Expense(Decimal, String),
    Invoice(Decimal),
    Payment(Decimal),
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        positive_amount().prop_map(Event::Income),
        (positive_amount(), category()).prop_map(|(a, c)| Event::Expense(a, c)),
        positive_amount().prop_map(Event::Invoice),
        positive_amount().prop_map(Event::Payment),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn service() -> (Arc<InMemoryLedger>, PostingService) {
    let store = Arc::new(InMemoryLedger::with_default_chart());
    let service = PostingService::with_store(store.clone(), LedgerConfig::default());
    (store, service)
}

async fn post(service: &PostingService, tenant_id: TenantId, n: usize, event: Event) {
    let date = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
    let invoice = |amount| InvoiceInput {
        tenant_id,
        amount,
        invoice_number: format!("INV-{n}"),
        customer_name: "Acme".to_string(),
        date,
        author: None,
    };

    let posted = match event {
        Event::Income(amount) => {
            service
                .post_income(IncomeInput {
                    tenant_id,
                    amount,
                    description: "Sale".to_string(),
                    date,
                    reference: None,
                    author: None,
                })
                .await
        }
        Event::Expense(amount, category) => {
            service
                .post_expense(ExpenseInput {
                    tenant_id,
                    amount,
                    description: "Purchase".to_string(),
                    category,
                    date,
                    reference: None,
                    author: None,
                })
                .await
        }
        Event::Invoice(amount) => service.post_invoice_issued(invoice(amount)).await,
        Event::Payment(amount) => service.post_payment_received(invoice(amount)).await,
    };
    assert!(posted.unwrap().is_some());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Every posted entry has two lines, one pure debit and one pure credit,
    /// and balances exactly.
    #[test]
    fn prop_posted_entries_balance(events in prop::collection::vec(event(), 1..10)) {
        let (store, service) = service();
        let tenant_id = TenantId::new();

        runtime().block_on(async {
            for (n, event) in events.iter().cloned().enumerate() {
                post(&service, tenant_id, n, event).await;
            }
        });

        for entry in store.entries() {
            let totals = entry.totals();
            prop_assert_eq!(totals.total_debit, totals.total_credit);
            prop_assert_eq!(entry.lines.len(), 2);
            for line in &entry.lines {
                prop_assert!(line.debit.is_zero() != line.credit.is_zero());
            }
        }
    }

    /// Entry sequences strictly increase per tenant and the trial balance
    /// stays balanced.
    #[test]
    fn prop_numbers_increase_and_trial_balance_holds(
        events in prop::collection::vec(event(), 1..10),
    ) {
        let (store, service) = service();
        let tenant_id = TenantId::new();

        let trial = runtime().block_on(async {
            for (n, event) in events.iter().cloned().enumerate() {
                post(&service, tenant_id, n, event).await;
            }
            service.trial_balance(tenant_id, None).await.unwrap()
        });

        let sequences: Vec<u64> = store
            .entries()
            .iter()
            .map(|e| parse_entry_number(&e.entry_number).unwrap().1)
            .collect();
        prop_assert!(sequences.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(sequences.len(), events.len());
        prop_assert!(trial.is_balanced());
    }
}
