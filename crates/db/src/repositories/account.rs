//! Account repository for chart of accounts lookups.
//!
//! Accounts are resolved per tenant: a tenant's own account wins over the
//! shared default account with the same code.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tally_core::ledger::{AccountCode, AccountInfo, AccountResolver, LedgerError};
use tally_shared::types::{AccountId, TenantId};
use tracing::info;
use uuid::Uuid;

use super::error::RepositoryError;
use crate::entities::chart_of_accounts;

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the account a tenant posts to for `code`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(
        &self,
        code: &str,
        tenant_id: TenantId,
    ) -> Result<Option<chart_of_accounts::Model>, RepositoryError> {
        let candidates = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::Code.eq(code))
            .filter(visible_to(tenant_id))
            .all(&self.db)
            .await?;

        Ok(prefer_tenant_scoped(candidates))
    }

    /// Lists every account visible to a tenant, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_tenant(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<chart_of_accounts::Model>, RepositoryError> {
        let accounts = chart_of_accounts::Entity::find()
            .filter(visible_to(tenant_id))
            .order_by_asc(chart_of_accounts::Column::Code)
            .all(&self.db)
            .await?;

        Ok(accounts)
    }

    /// Inserts the default chart for a tenant, or the shared chart when
    /// `tenant_id` is `None`. Codes already present are left untouched.
    ///
    /// Returns the number of accounts inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn seed_default_chart(
        &self,
        tenant_id: Option<TenantId>,
    ) -> Result<u64, RepositoryError> {
        let scope = match tenant_id {
            Some(tenant) => chart_of_accounts::Column::TenantId.eq(tenant.0),
            None => chart_of_accounts::Column::TenantId.is_null(),
        };
        let existing: HashSet<String> = chart_of_accounts::Entity::find()
            .filter(scope)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|a| a.code)
            .collect();

        let now = Utc::now().into();
        let mut inserted = 0;
        for account in AccountCode::ALL {
            if existing.contains(account.code()) {
                continue;
            }
            chart_of_accounts::ActiveModel {
                id: Set(Uuid::now_v7()),
                tenant_id: Set(tenant_id.map(TenantId::into_inner)),
                code: Set(account.code().to_string()),
                name: Set(account.name().to_string()),
                created_at: Set(now),
            }
            .insert(&self.db)
            .await?;
            inserted += 1;
        }

        info!(
            tenant_id = ?tenant_id,
            inserted,
            "Default chart of accounts seeded"
        );
        Ok(inserted)
    }
}

/// Shared accounts plus the tenant's own.
fn visible_to(tenant_id: TenantId) -> Condition {
    Condition::any()
        .add(chart_of_accounts::Column::TenantId.eq(tenant_id.0))
        .add(chart_of_accounts::Column::TenantId.is_null())
}

fn prefer_tenant_scoped(
    candidates: Vec<chart_of_accounts::Model>,
) -> Option<chart_of_accounts::Model> {
    let (scoped, shared): (Vec<_>, Vec<_>) =
        candidates.into_iter().partition(|a| a.tenant_id.is_some());
    scoped.into_iter().next().or_else(|| shared.into_iter().next())
}

fn to_account_info(model: chart_of_accounts::Model) -> AccountInfo {
    AccountInfo {
        id: AccountId::from_uuid(model.id),
        code: model.code,
        name: model.name,
        tenant_id: model.tenant_id.map(TenantId::from_uuid),
    }
}

#[async_trait]
impl AccountResolver for AccountRepository {
    async fn lookup_account_id(
        &self,
        code: &str,
        tenant_id: TenantId,
    ) -> Result<Option<AccountId>, LedgerError> {
        let account = self.find_by_code(code, tenant_id).await?;
        Ok(account.map(|a| AccountId::from_uuid(a.id)))
    }

    async fn list_accounts(&self, tenant_id: TenantId) -> Result<Vec<AccountInfo>, LedgerError> {
        let accounts = self.list_for_tenant(tenant_id).await?;
        Ok(accounts.into_iter().map(to_account_info).collect())
    }
}
