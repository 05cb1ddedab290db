//! Seeds the shared default chart of accounts.
//!
//! Shared accounts have no tenant and serve every tenant that has not
//! defined its own account with the same code.

use sea_orm_migration::prelude::*;
use tally_core::ledger::AccountCode;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(&default_chart_sql()).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DELETE FROM chart_of_accounts WHERE tenant_id IS NULL;")
            .await?;
        Ok(())
    }
}

fn default_chart_sql() -> String {
    let values: Vec<String> = AccountCode::ALL
        .iter()
        .map(|account| format!("('{}', '{}')", account.code(), account.name()))
        .collect();

    format!(
        "INSERT INTO chart_of_accounts (code, name) VALUES {} ON CONFLICT DO NOTHING;",
        values.join(", ")
    )
}
