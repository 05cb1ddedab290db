//! Journal repository for entry persistence and lookups.
//!
//! An entry and its lines are written in one database transaction. The
//! tenant's entry count is read inside the same transaction and the
//! `(tenant_id, entry_number)` unique constraint rejects a concurrent
//! posting that computed the same number.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tally_core::ledger::{
    EntryStatus, JournalEntry, JournalLine, JournalStore, LedgerError, NewJournalEntry,
    NewJournalLine, format_entry_number,
};
use tally_shared::types::{
    AccountId, JournalEntryId, JournalLineId, PageRequest, TenantId, UserId,
};
use tracing::debug;
use uuid::Uuid;

use super::error::RepositoryError;
use crate::entities::{journal_entries, journal_lines};

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Numbers and inserts an entry with all its lines atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails, including a duplicate entry
    /// number. Nothing is written in that case.
    pub async fn create_entry(
        &self,
        entry: NewJournalEntry,
    ) -> Result<JournalEntry, RepositoryError> {
        // Start database transaction
        let txn = self.db.begin().await?;

        let existing = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(entry.tenant_id.0))
            .count(&txn)
            .await?;
        let entry_number = format_entry_number(entry.date.year(), existing);

        let header = insert_header(&txn, &entry, entry_number).await?;
        let lines = insert_lines(&txn, header.id, &entry.lines).await?;

        // Commit database transaction
        txn.commit().await?;

        debug!(
            entry_id = %header.id,
            entry_number = %header.entry_number,
            lines = lines.len(),
            "Journal entry inserted"
        );
        to_journal_entry(header, lines)
    }

    /// Counts a tenant's entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_for_tenant(&self, tenant_id: TenantId) -> Result<u64, RepositoryError> {
        let count = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(tenant_id.0))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// Gets an entry by ID with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: JournalEntryId,
    ) -> Result<Option<JournalEntry>, RepositoryError> {
        let header = journal_entries::Entity::find_by_id(id.0)
            .one(&self.db)
            .await?;
        self.with_lines_one(header).await
    }

    /// Gets the earliest-created entry whose reference equals `reference`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<JournalEntry>, RepositoryError> {
        let header = journal_entries::Entity::find()
            .filter(journal_entries::Column::Reference.eq(reference))
            .order_by_asc(journal_entries::Column::CreatedAt)
            .order_by_asc(journal_entries::Column::Id)
            .one(&self.db)
            .await?;
        self.with_lines_one(header).await
    }

    /// Finds the earliest entry of one tenant carrying `reference`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_tenant_reference(
        &self,
        tenant_id: TenantId,
        reference: &str,
    ) -> Result<Option<JournalEntry>, RepositoryError> {
        let header = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(tenant_id.0))
            .filter(journal_entries::Column::Reference.eq(reference))
            .order_by_asc(journal_entries::Column::CreatedAt)
            .order_by_asc(journal_entries::Column::Id)
            .one(&self.db)
            .await?;
        self.with_lines_one(header).await
    }

    /// Lists a page of a tenant's entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_tenant(
        &self,
        tenant_id: TenantId,
        page: &PageRequest,
    ) -> Result<Vec<JournalEntry>, RepositoryError> {
        let headers = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(tenant_id.0))
            .order_by_desc(journal_entries::Column::CreatedAt)
            .order_by_desc(journal_entries::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        self.with_lines(headers).await
    }

    /// Gets every line of a tenant's entries dated on or before `as_of`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn lines_for_tenant(
        &self,
        tenant_id: TenantId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<JournalLine>, RepositoryError> {
        let mut query = journal_lines::Entity::find()
            .inner_join(journal_entries::Entity)
            .filter(journal_entries::Column::TenantId.eq(tenant_id.0));

        if let Some(as_of) = as_of {
            query = query.filter(journal_entries::Column::EntryDate.lte(as_of));
        }

        query
            .order_by_asc(journal_lines::Column::JournalEntryId)
            .order_by_asc(journal_lines::Column::LineNumber)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_journal_line)
            .collect()
    }

    async fn with_lines_one(
        &self,
        header: Option<journal_entries::Model>,
    ) -> Result<Option<JournalEntry>, RepositoryError> {
        match header {
            Some(header) => Ok(self.with_lines(vec![header]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Loads the lines of `headers` in one query, preserving header order.
    async fn with_lines(
        &self,
        headers: Vec<journal_entries::Model>,
    ) -> Result<Vec<JournalEntry>, RepositoryError> {
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = headers.iter().map(|h| h.id).collect();
        let mut lines_by_entry: HashMap<Uuid, Vec<journal_lines::Model>> = HashMap::new();
        for line in journal_lines::Entity::find()
            .filter(journal_lines::Column::JournalEntryId.is_in(ids))
            .order_by_asc(journal_lines::Column::LineNumber)
            .all(&self.db)
            .await?
        {
            lines_by_entry
                .entry(line.journal_entry_id)
                .or_default()
                .push(line);
        }

        headers
            .into_iter()
            .map(|header| {
                let lines = lines_by_entry.remove(&header.id).unwrap_or_default();
                to_journal_entry(header, lines)
            })
            .collect()
    }
}

/// Inserts the entry header.
async fn insert_header(
    txn: &DatabaseTransaction,
    entry: &NewJournalEntry,
    entry_number: String,
) -> Result<journal_entries::Model, RepositoryError> {
    let header = journal_entries::ActiveModel {
        id: Set(JournalEntryId::new().0),
        tenant_id: Set(entry.tenant_id.0),
        entry_number: Set(entry_number),
        entry_date: Set(entry.date),
        description: Set(entry.description.clone()),
        reference: Set(entry.reference.clone()),
        status: Set(EntryStatus::Posted.as_str().to_string()),
        created_by: Set(entry.author.map(UserId::into_inner)),
        created_at: Set(Utc::now().into()),
    };

    Ok(header.insert(txn).await?)
}

/// Inserts the lines in order, numbering them from 1.
async fn insert_lines(
    txn: &DatabaseTransaction,
    entry_id: Uuid,
    lines: &[NewJournalLine],
) -> Result<Vec<journal_lines::Model>, RepositoryError> {
    let mut inserted = Vec::with_capacity(lines.len());

    for (line, line_number) in lines.iter().zip(1..) {
        let model = journal_lines::ActiveModel {
            id: Set(JournalLineId::new().0),
            journal_entry_id: Set(entry_id),
            account_id: Set(line.account_id.0),
            debit: Set(line.debit()),
            credit: Set(line.credit()),
            description: Set(line.description.clone()),
            line_number: Set(line_number),
        };
        inserted.push(model.insert(txn).await?);
    }

    Ok(inserted)
}

fn to_journal_line(model: journal_lines::Model) -> Result<JournalLine, RepositoryError> {
    let line_number = u32::try_from(model.line_number).map_err(|_| RepositoryError::CorruptRow {
        table: "journal_lines",
        reason: format!("negative line_number {}", model.line_number),
    })?;

    Ok(JournalLine {
        id: JournalLineId::from_uuid(model.id),
        entry_id: JournalEntryId::from_uuid(model.journal_entry_id),
        account_id: AccountId::from_uuid(model.account_id),
        debit: model.debit,
        credit: model.credit,
        description: model.description,
        line_number,
    })
}

fn to_journal_entry(
    header: journal_entries::Model,
    lines: Vec<journal_lines::Model>,
) -> Result<JournalEntry, RepositoryError> {
    let status = header
        .status
        .parse::<EntryStatus>()
        .map_err(|reason| RepositoryError::CorruptRow {
            table: "journal_entries",
            reason,
        })?;

    Ok(JournalEntry {
        id: JournalEntryId::from_uuid(header.id),
        tenant_id: TenantId::from_uuid(header.tenant_id),
        entry_number: header.entry_number,
        date: header.entry_date,
        description: header.description,
        reference: header.reference,
        status,
        author: header.created_by.map(UserId::from_uuid),
        created_at: header.created_at.with_timezone(&Utc),
        lines: lines
            .into_iter()
            .map(to_journal_line)
            .collect::<Result<_, _>>()?,
    })
}

#[async_trait]
impl JournalStore for JournalRepository {
    async fn create_entry(&self, entry: NewJournalEntry) -> Result<JournalEntry, LedgerError> {
        Ok(JournalRepository::create_entry(self, entry).await?)
    }

    async fn count_entries(&self, tenant_id: TenantId) -> Result<u64, LedgerError> {
        Ok(self.count_for_tenant(tenant_id).await?)
    }

    async fn find_entry(&self, id: JournalEntryId) -> Result<Option<JournalEntry>, LedgerError> {
        Ok(self.find_by_id(id).await?)
    }

    async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        Ok(JournalRepository::find_by_reference(self, reference).await?)
    }

    async fn find_tenant_reference(
        &self,
        tenant_id: TenantId,
        reference: &str,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        Ok(self.find_by_tenant_reference(tenant_id, reference).await?)
    }

    async fn list_entries(
        &self,
        tenant_id: TenantId,
        page: &PageRequest,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        Ok(self.list_for_tenant(tenant_id, page).await?)
    }

    async fn lines_for_tenant(
        &self,
        tenant_id: TenantId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<JournalLine>, LedgerError> {
        Ok(JournalRepository::lines_for_tenant(self, tenant_id, as_of).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn header(id: Uuid, status: &str) -> journal_entries::Model {
        journal_entries::Model {
            id,
            tenant_id: Uuid::now_v7(),
            entry_number: "JE-2025-000003".to_string(),
            entry_date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            description: "Expense: November office rent".to_string(),
            reference: Some("exp-1".to_string()),
            status: status.to_string(),
            created_by: None,
            created_at: Utc::now().into(),
        }
    }

    fn line(entry_id: Uuid, debit: Decimal, credit: Decimal, n: i32) -> journal_lines::Model {
        journal_lines::Model {
            id: Uuid::now_v7(),
            journal_entry_id: entry_id,
            account_id: Uuid::now_v7(),
            debit,
            credit,
            description: "Expense: November office rent".to_string(),
            line_number: n,
        }
    }

    #[tokio::test]
    async fn test_find_by_reference_loads_lines() {
        let id = Uuid::now_v7();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![header(id, "POSTED")]])
            .append_query_results([vec![
                line(id, dec!(1500.00), Decimal::ZERO, 1),
                line(id, Decimal::ZERO, dec!(1500.00), 2),
            ]])
            .into_connection();
        let repo = JournalRepository::new(db);

        let entry = repo.find_by_reference("exp-1").await.unwrap().unwrap();

        assert_eq!(entry.id, JournalEntryId::from_uuid(id));
        assert_eq!(entry.status, EntryStatus::Posted);
        assert_eq!(entry.lines.len(), 2);
        assert_eq!(entry.lines[0].line_number, 1);
        assert_eq!(entry.lines[1].credit, dec!(1500.00));
        assert!(entry.totals().is_balanced_within(Decimal::ZERO));
    }

    #[tokio::test]
    async fn test_find_by_reference_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<journal_entries::Model>::new()])
            .into_connection();
        let repo = JournalRepository::new(db);

        assert!(repo.find_by_reference("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_tenant_reference_filters_on_tenant() {
        let id = Uuid::now_v7();
        let tenant = TenantId::new();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![header(id, "POSTED")]])
            .append_query_results([vec![
                line(id, dec!(10), Decimal::ZERO, 1),
                line(id, Decimal::ZERO, dec!(10), 2),
            ]])
            .into_connection();
        let repo = JournalRepository::new(db);

        let entry = repo
            .find_by_tenant_reference(tenant, "REV-JE-2025-000001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.lines.len(), 2);

        let log = format!("{:?}", repo.db.into_transaction_log()[0]);
        assert!(log.contains(&tenant.0.to_string()));
        assert!(log.contains("REV-JE-2025-000001"));
    }

    #[tokio::test]
    async fn test_count_entries() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([("num_items", Value::BigInt(Some(7)))])]])
            .into_connection();
        let repo = JournalRepository::new(db);

        assert_eq!(repo.count_entries(TenantId::new()).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_database_failure_is_a_persistence_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([sea_orm::DbErr::Custom("connection reset".into())])
            .into_connection();
        let repo = JournalRepository::new(db);

        let result = repo.find_entry(JournalEntryId::new()).await;

        assert!(matches!(result, Err(LedgerError::Persistence(_))));
    }

    #[test]
    fn test_unknown_status_is_corrupt() {
        let result = to_journal_entry(header(Uuid::now_v7(), "DRAFT"), vec![]);
        assert!(matches!(
            result,
            Err(RepositoryError::CorruptRow { table: "journal_entries", .. })
        ));
    }

    #[test]
    fn test_negative_line_number_is_corrupt() {
        let result = to_journal_line(line(Uuid::now_v7(), dec!(1), Decimal::ZERO, -1));
        assert!(matches!(
            result,
            Err(RepositoryError::CorruptRow { table: "journal_lines", .. })
        ));
    }
}
