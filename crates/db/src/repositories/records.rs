//! Business record repository for transactions and expenses.
//!
//! The posting service only deletes these records; creation and lookup
//! serve the seeder and tests.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tally_core::ledger::{BusinessRecordStore, LedgerError};
use tally_shared::types::{Amount, ExpenseId, TenantId, TransactionId};

use super::error::RepositoryError;
use crate::entities::{expenses, transactions};

/// Input for creating a bank or cash transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Tenant owning the record.
    pub tenant_id: TenantId,
    /// Amount moved.
    pub amount: Amount,
    /// Free-text description.
    pub description: String,
    /// Business date.
    pub date: NaiveDate,
}

/// Input for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Tenant owning the record.
    pub tenant_id: TenantId,
    /// Amount paid.
    pub amount: Amount,
    /// Free-text description.
    pub description: String,
    /// Category used to classify the expense account.
    pub category: String,
    /// Business date.
    pub date: NaiveDate,
}

/// Business record repository.
#[derive(Debug, Clone)]
pub struct BusinessRecordRepository {
    db: DatabaseConnection,
}

impl BusinessRecordRepository {
    /// Creates a new business record repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a transaction record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, RepositoryError> {
        let model = transactions::ActiveModel {
            id: Set(TransactionId::new().0),
            tenant_id: Set(input.tenant_id.0),
            amount: Set(input.amount.value()),
            description: Set(input.description),
            transaction_date: Set(input.date),
            created_at: Set(Utc::now().into()),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Creates an expense record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create_expense(
        &self,
        input: CreateExpenseInput,
    ) -> Result<expenses::Model, RepositoryError> {
        let model = expenses::ActiveModel {
            id: Set(ExpenseId::new().0),
            tenant_id: Set(input.tenant_id.0),
            amount: Set(input.amount.value()),
            description: Set(input.description),
            category: Set(input.category),
            expense_date: Set(input.date),
            created_at: Set(Utc::now().into()),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Gets a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Option<transactions::Model>, RepositoryError> {
        Ok(transactions::Entity::find_by_id(id.0).one(&self.db).await?)
    }

    /// Gets an expense by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_expense(
        &self,
        id: ExpenseId,
    ) -> Result<Option<expenses::Model>, RepositoryError> {
        Ok(expenses::Entity::find_by_id(id.0).one(&self.db).await?)
    }
}

#[async_trait]
impl BusinessRecordStore for BusinessRecordRepository {
    async fn delete_transaction(&self, id: TransactionId) -> Result<bool, LedgerError> {
        let result = transactions::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(RepositoryError::from)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_expense(&self, id: ExpenseId) -> Result<bool, LedgerError> {
        let result = expenses::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(RepositoryError::from)?;
        Ok(result.rows_affected > 0)
    }
}
