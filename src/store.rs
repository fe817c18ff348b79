//! Database handle: one `query(statement) -> rows` operation, backed by a PostgreSQL pool.

use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::sql::{PgBindValue, Statement};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use std::time::Duration;

/// A row as returned by the store, column name → JSON value.
pub type Row = Map<String, Value>;

/// Anything that can run one parameterized statement and hand back the resulting rows.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn query(&self, statement: &Statement) -> Result<Vec<Row>, AppError>;
}

/// Shared PostgreSQL pool. Created once at startup, closed on shutdown.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    /// Build the pool without requiring the database to be up. A failed initial ping is
    /// logged; requests then fail per call until the database becomes reachable.
    /// Only malformed connection options are an error.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy_with(config.connect_options()?);
        let store = PgStore { pool };
        match store.ping().await {
            Ok(()) => {
                tracing::info!(host = %config.host, database = %config.database, "connected to PostgreSQL")
            }
            Err(e) => {
                tracing::error!(host = %config.host, database = %config.database, error = %e, "database connection error")
            }
        }
        Ok(store)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database pool closed");
    }
}

#[async_trait]
impl Store for PgStore {
    async fn query(&self, statement: &Statement) -> Result<Vec<Row>, AppError> {
        tracing::debug!(sql = %statement.sql, params = ?statement.params, "query");
        // Parameter types follow the JSON value of each call, so the same SQL text can arrive
        // with different types; an unnamed statement is prepared per call.
        let mut query = sqlx::query(&statement.sql).persistent(false);
        for p in &statement.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }
}

fn row_to_json(row: &PgRow) -> Row {
    use sqlx::{Column, Row as _};
    let mut map = Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    map
}

/// Decode one cell by trying the column types this schema uses, most specific first.
fn cell_to_value(row: &PgRow, name: &str) -> Value {
    use sqlx::{Row as _, ValueRef};
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n as f64) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(d)) = row.try_get::<Option<rust_decimal::Decimal>, _>(name) {
        return Value::String(d.to_string());
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(name) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(t)) = row.try_get::<Option<chrono::NaiveTime>, _>(name) {
        return Value::String(t.format("%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(name) {
        return j;
    }
    let Ok(raw) = row.try_get_raw(name) else {
        return Value::Null;
    };
    if raw.is_null() {
        return Value::Null;
    }
    // User enums arrive as their label bytes.
    if let Ok(Some(s)) = row.try_get_unchecked::<Option<String>, _>(name) {
        if !s.chars().any(char::is_control) {
            return Value::String(s);
        }
    }
    tracing::warn!(column = %name, type_info = ?raw.type_info(), "cell type not decodable, returning null");
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> DatabaseConfig {
        DatabaseConfig {
            url: None,
            host: "127.0.0.1".into(),
            port: 1,
            user: "postgres".into(),
            password: None,
            database: "football".into(),
            max_connections: 1,
            acquire_timeout_secs: 1,
        }
    }

    #[tokio::test]
    async fn unreachable_database_still_builds_store() {
        let store = PgStore::connect(&unreachable_config()).await.unwrap();
        assert!(store.ping().await.is_err());
        let err = store.query(&Statement::raw("SELECT 1")).await.unwrap_err();
        assert!(matches!(err, AppError::Db(_)));
    }

    #[tokio::test]
    async fn malformed_url_is_an_error() {
        let config = DatabaseConfig {
            url: Some("not a url".into()),
            ..unreachable_config()
        };
        assert!(PgStore::connect(&config).await.is_err());
    }
}
