//! Exhibition persistence: one JSONB document row per record, plus the
//! startup helpers that make the database and table exist.

use crate::error::AppError;
use crate::schema;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use uuid::Uuid;

/// Handle to the exhibitions document table. Cloning shares the pool.
#[derive(Clone)]
pub struct ExhibitionStore {
    pool: PgPool,
}

impl ExhibitionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Idempotent DDL for the document table. Call once at startup.
    pub async fn ensure_table(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS exhibitions (
                id UUID PRIMARY KEY,
                doc JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert a validated document under a fresh id; returns the stored record.
    pub async fn insert(&self, doc: &Map<String, Value>) -> Result<Value, AppError> {
        let id = Uuid::new_v4();
        let (created_at, updated_at): (DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO exhibitions (id, doc) VALUES ($1, $2) RETURNING created_at, updated_at",
        )
        .bind(id)
        .bind(Value::Object(doc.clone()))
        .fetch_one(&self.pool)
        .await?;
        Ok(record(id, doc.clone(), created_at, updated_at))
    }

    /// All records in store-default order.
    pub async fn list(&self) -> Result<Vec<Value>, AppError> {
        let rows: Vec<(Uuid, Value, DateTime<Utc>, DateTime<Utc>)> =
            sqlx::query_as("SELECT id, doc, created_at, updated_at FROM exhibitions")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, doc, created_at, updated_at)| {
                record(id, doc_fields(doc), created_at, updated_at)
            })
            .collect())
    }

    /// One record by id, or None.
    pub async fn find(&self, id: Uuid) -> Result<Option<Value>, AppError> {
        let row: Option<(Value, DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            "SELECT doc, created_at, updated_at FROM exhibitions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(doc, created_at, updated_at)| {
            record(id, doc_fields(doc), created_at, updated_at)
        }))
    }

    /// The raw stored document for an id, without row metadata. Update
    /// handlers merge their patch over this.
    pub async fn find_document(&self, id: Uuid) -> Result<Option<Map<String, Value>>, AppError> {
        let row: Option<(Value,)> = sqlx::query_as("SELECT doc FROM exhibitions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(doc,)| doc_fields(doc)))
    }

    /// Replace the stored document and bump `updated_at`. None when the id
    /// is unknown.
    pub async fn update(
        &self,
        id: Uuid,
        doc: &Map<String, Value>,
    ) -> Result<Option<Value>, AppError> {
        let row: Option<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            "UPDATE exhibitions SET doc = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING created_at, updated_at",
        )
        .bind(id)
        .bind(Value::Object(doc.clone()))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|(created_at, updated_at)| record(id, doc.clone(), created_at, updated_at)))
    }

    /// Delete by id; false when the id is unknown.
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM exhibitions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Navigation projection: `_id` plus `navTitle` for every record,
    /// nothing else leaves the store.
    pub async fn list_nav(&self) -> Result<Vec<Value>, AppError> {
        let rows: Vec<(Uuid, Option<String>)> =
            sqlx::query_as("SELECT id, doc->>'navTitle' FROM exhibitions")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, nav_title)| schema::nav_entry(id, nav_title))
            .collect())
    }
}

/// Wire shape of one stored record: `_id`, the document fields, then the
/// row timestamps as `createdAt`/`updatedAt`.
fn record(
    id: Uuid,
    doc: Map<String, Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Value {
    let mut obj = Map::new();
    obj.insert("_id".into(), Value::String(id.to_string()));
    for (key, value) in doc {
        obj.insert(key, value);
    }
    obj.insert("createdAt".into(), Value::String(created_at.to_rfc3339()));
    obj.insert("updatedAt".into(), Value::String(updated_at.to_rfc3339()));
    Value::Object(obj)
}

fn doc_fields(doc: Value) -> Map<String, Value> {
    match doc {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}

/// Ensure the database named in `database_url` exists, creating it through
/// the server's default `postgres` database when missing. Call before
/// opening the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = split_database_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::Internal(format!("invalid DATABASE_URL: {e}")))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split a connection URL into (admin URL pointing at `postgres`, database name).
fn split_database_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::Internal("DATABASE_URL has no database path".into()))?
        + 1;
    let db_name = url
        .get(path_start..)
        .unwrap_or("")
        .split('?')
        .next()
        .unwrap_or("")
        .trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{base}postgres"), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}
