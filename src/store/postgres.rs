use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::time::Duration;
use tracing::info;

use super::{known_collection, DocumentStore, StoreError, COLLECTIONS};
use crate::config;

/// Document store backed by Postgres: one table per collection, each row a
/// `(id TEXT PRIMARY KEY, doc JSONB)` pair.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect using `DATABASE_URL` and the configured pool settings.
    pub async fn connect() -> Result<Self, StoreError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| StoreError::ConfigMissing("DATABASE_URL"))?;

        let database = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(database.max_connections)
            .acquire_timeout(Duration::from_secs(database.connection_timeout_secs))
            .connect(&url)
            .await?;

        info!("Connected document store pool");
        Ok(Self { pool })
    }

    /// Create the collection tables if they do not exist yet.
    pub async fn ensure_collections(&self) -> Result<(), StoreError> {
        for table in COLLECTIONS {
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" (id TEXT PRIMARY KEY, doc JSONB NOT NULL)",
                table
            );
            sqlx::query(&sql).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn put(
        &self,
        collection: &str,
        id: &str,
        doc: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let table = known_collection(collection)?;
        let sql = format!(
            "INSERT INTO \"{}\" (id, doc) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc",
            table
        );

        sqlx::query(&sql)
            .bind(id)
            .bind(Value::Object(doc))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Map<String, Value>>, StoreError> {
        let table = known_collection(collection)?;
        let sql = format!("SELECT doc FROM \"{}\" WHERE id = $1", table);

        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;

        Ok(row.and_then(|r| {
            r.try_get::<Value, _>("doc")
                .ok()
                .and_then(|v| v.as_object().cloned())
        }))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let table = known_collection(collection)?;
        // `||` is a shallow JSONB merge; UPDATE is a no-op for absent rows
        let sql = format!("UPDATE \"{}\" SET doc = doc || $2 WHERE id = $1", table);

        sqlx::query(&sql)
            .bind(id)
            .bind(Value::Object(patch))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, StoreError> {
        let table = known_collection(collection)?;
        let sql = format!("SELECT id, doc FROM \"{}\" WHERE doc ->> $1 = $2", table);

        let rows = sqlx::query(&sql)
            .bind(field)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("id")?;
            let doc: Value = row.try_get("doc")?;
            if let Value::Object(mut map) = doc {
                map.insert("id".to_string(), Value::String(id));
                results.push(Value::Object(map));
            }
        }
        Ok(results)
    }
}
