//! Generic CRUD execution for one table. Each call issues exactly one statement.

use crate::error::AppError;
use crate::record::Record;
use crate::sql::{delete, insert, select_all, select_by_id, update, Statement, TableSchema};
use crate::store::{Row, Store};
use std::sync::Arc;

#[derive(Clone)]
pub struct TableAccessor {
    table: String,
    store: Arc<dyn Store>,
    schema: Option<TableSchema>,
}

impl TableAccessor {
    /// Accessor without column type information; records are passed through unchecked.
    pub fn new(table: impl Into<String>, store: Arc<dyn Store>) -> Self {
        TableAccessor {
            table: table.into(),
            store,
            schema: None,
        }
    }

    pub fn with_schema(mut self, schema: TableSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Read the table's columns from the store. A missing table or a failed lookup
    /// leaves the accessor schema-less.
    pub async fn introspect(table: impl Into<String>, store: Arc<dyn Store>) -> Self {
        let accessor = Self::new(table, store);
        match accessor.load_schema().await {
            Ok(Some(schema)) => accessor.with_schema(schema),
            Ok(None) => {
                tracing::warn!(table = %accessor.table, "table has no columns in current schema");
                accessor
            }
            Err(e) => {
                tracing::warn!(table = %accessor.table, error = %e, "schema lookup failed");
                accessor
            }
        }
    }

    /// Column types for this table, `None` when the current schema has no such table.
    pub async fn load_schema(&self) -> Result<Option<TableSchema>, AppError> {
        let rows = self.store.query(&TableSchema::introspect(&self.table)).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(TableSchema::from_rows(&rows)))
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn schema(&self) -> Option<&TableSchema> {
        self.schema.as_ref()
    }

    /// All rows, highest id first.
    pub async fn find_all(&self) -> Result<Vec<Row>, AppError> {
        let q = select_all(&self.table, self.schema.as_ref());
        self.store.query(&q).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Row>, AppError> {
        let q = select_by_id(&self.table, id, self.schema.as_ref());
        self.first(&q).await
    }

    /// Insert one row. Returns the row as stored, including generated columns.
    pub async fn create(&self, record: &Record) -> Result<Row, AppError> {
        self.check(record)?;
        let q = insert(&self.table, record, self.schema.as_ref());
        self.first(&q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    /// Update the given columns and `updated_at`. `None` when no row has `id`.
    pub async fn update(&self, id: i64, record: &Record) -> Result<Option<Row>, AppError> {
        self.check(record)?;
        let q = update(&self.table, id, record, self.schema.as_ref());
        self.first(&q).await
    }

    /// Delete by id. Returns the removed row, `None` when no row has `id`.
    pub async fn remove(&self, id: i64) -> Result<Option<Row>, AppError> {
        let q = delete(&self.table, id, self.schema.as_ref());
        self.first(&q).await
    }

    fn check(&self, record: &Record) -> Result<(), AppError> {
        match &self.schema {
            Some(schema) => record.check_columns(schema),
            None => Ok(()),
        }
    }

    async fn first(&self, q: &Statement) -> Result<Option<Row>, AppError> {
        Ok(self.store.query(q).await?.into_iter().next())
    }
}
