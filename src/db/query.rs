use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::{PgConnection, PgRow};
use sqlx::{Column, Connection, Decode, Postgres, Row, Type, TypeInfo};

use crate::error::Result;

/// One result row as a JSON object keyed by column name
pub type ResultRow = Map<String, Value>;

/// Executes caller-supplied SQL against the networked relational store
#[async_trait]
pub trait QueryRunner: Send + Sync {
    /// Run `sql` verbatim and return its rows
    async fn run(&self, sql: &str) -> Result<Vec<ResultRow>>;

    /// Open and close a connection to prove the store is reachable
    async fn ping(&self) -> Result<()>;
}

/// PostgreSQL runner with one connection per call
#[derive(Debug, Clone)]
pub struct PgQueryRunner {
    database_url: String,
}

impl PgQueryRunner {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }
}

#[async_trait]
impl QueryRunner for PgQueryRunner {
    async fn run(&self, sql: &str) -> Result<Vec<ResultRow>> {
        let mut conn = PgConnection::connect(&self.database_url).await?;

        let outcome = sqlx::query(sql).fetch_all(&mut conn).await;

        if let Err(e) = conn.close().await {
            tracing::warn!("Error closing query connection: {}", e);
        }

        let rows = outcome?;
        tracing::info!("Query returned {} rows", rows.len());

        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn ping(&self) -> Result<()> {
        let conn = PgConnection::connect(&self.database_url).await?;
        conn.close().await?;
        Ok(())
    }
}

/// Convert a row, decoding each column by its PostgreSQL type
pub fn row_to_json(row: &PgRow) -> ResultRow {
    row.columns()
        .iter()
        .map(|column| {
            let value = column_value(row, column.ordinal(), column.type_info().name());
            (column.name().to_string(), value)
        })
        .collect()
}

fn column_value(row: &PgRow, idx: usize, type_name: &str) -> Value {
    match type_name {
        "BOOL" => decode::<bool>(row, idx).map(Value::Bool),
        "INT2" => decode::<i16>(row, idx).map(Value::from),
        "INT4" => decode::<i32>(row, idx).map(Value::from),
        "INT8" => decode::<i64>(row, idx).map(Value::from),
        "FLOAT4" => decode::<f32>(row, idx).map(|v| Value::from(f64::from(v))),
        "FLOAT8" => decode::<f64>(row, idx).map(Value::from),
        // Kept as a string so precision survives the trip through JSON
        "NUMERIC" => decode::<bigdecimal::BigDecimal>(row, idx).map(|v| Value::String(v.to_string())),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CITEXT" => {
            decode::<String>(row, idx).map(Value::String)
        }
        "JSON" | "JSONB" => decode::<Value>(row, idx),
        "TIMESTAMPTZ" => decode::<DateTime<Utc>>(row, idx).map(|v| Value::String(v.to_rfc3339())),
        "TIMESTAMP" => decode::<NaiveDateTime>(row, idx).map(|v| Value::String(v.to_string())),
        "DATE" => decode::<NaiveDate>(row, idx).map(|v| Value::String(v.to_string())),
        "TIME" => decode::<NaiveTime>(row, idx).map(|v| Value::String(v.to_string())),
        "BYTEA" => decode::<Vec<u8>>(row, idx).map(|v| Value::String(hex::encode(v))),
        other => {
            let value = decode::<String>(row, idx).map(Value::String);
            if value.is_none() {
                tracing::debug!("Column {} has unsupported type {}, returning null", idx, other);
            }
            value
        }
    }
    .unwrap_or(Value::Null)
}

/// SQL NULL and undecodable values both come back as `None`
fn decode<'r, T>(row: &'r PgRow, idx: usize) -> Option<T>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get::<Option<T>, _>(idx).ok().flatten()
}
