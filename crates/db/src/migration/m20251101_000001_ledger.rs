//! Ledger schema migration.
//!
//! Creates the chart of accounts, journal entries and lines, and the two
//! business record tables whose deletion triggers a reversal.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(CHART_OF_ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 2: JOURNAL
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // ============================================================
        // PART 3: BUSINESS RECORDS
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const CHART_OF_ACCOUNTS_SQL: &str = r"
CREATE TABLE chart_of_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID,
    code VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- A code is unique among shared accounts and within each tenant
CREATE UNIQUE INDEX idx_coa_shared_code ON chart_of_accounts(code) WHERE tenant_id IS NULL;
CREATE UNIQUE INDEX idx_coa_tenant_code ON chart_of_accounts(tenant_id, code) WHERE tenant_id IS NOT NULL;
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL,
    entry_number VARCHAR(32) NOT NULL,
    entry_date DATE NOT NULL,
    description TEXT NOT NULL,
    reference VARCHAR(255),
    status VARCHAR(16) NOT NULL DEFAULT 'POSTED',
    created_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_je_status CHECK (status = 'POSTED'),
    -- Concurrent postings that computed the same number fail here
    UNIQUE (tenant_id, entry_number)
);

CREATE INDEX idx_je_tenant_created ON journal_entries(tenant_id, created_at DESC);
CREATE INDEX idx_je_reference ON journal_entries(reference, created_at) WHERE reference IS NOT NULL;
CREATE INDEX idx_je_tenant_date ON journal_entries(tenant_id, entry_date);
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES chart_of_accounts(id),
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    description TEXT NOT NULL,
    line_number INTEGER NOT NULL,
    CONSTRAINT chk_jl_debit_or_credit CHECK (
        (debit > 0 AND credit = 0) OR (debit = 0 AND credit > 0)
    ),
    CONSTRAINT chk_jl_line_number CHECK (line_number > 0),
    UNIQUE (journal_entry_id, line_number)
);

CREATE INDEX idx_jl_account ON journal_lines(account_id);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    description TEXT NOT NULL,
    transaction_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_tx_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_tx_tenant ON transactions(tenant_id, transaction_date);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    tenant_id UUID NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    description TEXT NOT NULL,
    category VARCHAR(100) NOT NULL,
    expense_date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_exp_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_exp_tenant ON expenses(tenant_id, expense_date);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS chart_of_accounts CASCADE;
";
