use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::constants::ERR_TABLE_AND_SQL_REQUIRED;
use crate::db::execute_script;
use crate::error::{AppError, Result};
use crate::sql::rewrite_table_name;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExecuteSqlRequest {
    #[serde(rename = "tableName", default)]
    pub table_name: String,
    #[serde(default)]
    pub sql: String,
}

#[derive(Debug, Serialize)]
pub struct ExecuteSqlResponse {
    pub success: bool,
    pub message: String,
}

/// Execute a (possibly edited) generated script against the embedded store
///
/// The script's CREATE TABLE target is renamed to `tableName` first. Failures
/// are reported to the caller as 500 rather than only being logged.
///
/// POST /api/execute-sql
pub async fn execute_sql(
    State(state): State<AppState>,
    Json(payload): Json<ExecuteSqlRequest>,
) -> Result<Json<ExecuteSqlResponse>> {
    if payload.table_name.is_empty() || payload.sql.trim().is_empty() {
        return Err(AppError::InvalidInput(ERR_TABLE_AND_SQL_REQUIRED.to_string()));
    }

    let sql = rewrite_table_name(&payload.sql, &payload.table_name)?;

    execute_script(
        &state.config.embedded_database_path(),
        &payload.table_name,
        &sql,
    )
    .await?;

    Ok(Json(ExecuteSqlResponse {
        success: true,
        message: format!("SQL executed successfully for table: {}", payload.table_name),
    }))
}
