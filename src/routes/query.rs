use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::constants::ERR_QUERY_REQUIRED;
use crate::db::ResultRow;
use crate::error::{AppError, Result};
use crate::models::QueryHistoryRecord;
use crate::security::AuthenticatedUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

impl QueryRequest {
    fn into_query(self) -> Result<String> {
        if self.query.trim().is_empty() {
            return Err(AppError::InvalidInput(ERR_QUERY_REQUIRED.to_string()));
        }
        Ok(self.query)
    }
}

#[derive(Debug, Serialize)]
pub struct RunQueryResponse {
    pub success: bool,
    pub result: Vec<ResultRow>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<QueryHistoryRecord>,
}

#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "deletedCount")]
    pub deleted_count: u64,
}

/// Run caller SQL verbatim on the networked store and record it
///
/// No statement filtering happens here; history is written only after the
/// query succeeds.
///
/// POST /api/run-query
pub async fn run_query(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<RunQueryResponse>> {
    let query = payload.into_query()?;

    let result = state.runner.run(&query).await?;
    state.history.save(&user.user_id, &query).await?;

    tracing::info!("Query executed for user {}: {} rows", user.user_id, result.len());

    Ok(Json(RunQueryResponse {
        success: true,
        result,
    }))
}

/// POST /api/save-query-history
pub async fn save_query_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<QueryRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let query = payload.into_query()?;

    state.history.save(&user.user_id, &query).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            success: true,
            message: "Query saved to history".to_string(),
        }),
    ))
}

/// Caller's own history, newest first
///
/// GET /api/query-history
pub async fn get_query_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<HistoryResponse>> {
    let history = state.history.list_for_user(&user.user_id).await?;

    tracing::debug!("Fetched {} history records for user {}", history.len(), user.user_id);

    Ok(Json(HistoryResponse {
        success: true,
        history,
    }))
}

/// Every user's history, newest first
///
/// GET /api/all-queries
pub async fn get_all_queries(State(state): State<AppState>) -> Result<Json<HistoryResponse>> {
    let history = state.history.list_all().await?;

    Ok(Json(HistoryResponse {
        success: true,
        history,
    }))
}

/// DELETE /api/query-history/clear
pub async fn clear_query_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ClearHistoryResponse>> {
    let deleted_count = state.history.clear_for_user(&user.user_id).await?;

    tracing::info!("Cleared {} history records for user {}", deleted_count, user.user_id);

    Ok(Json(ClearHistoryResponse {
        success: true,
        message: "Query history cleared successfully".to_string(),
        deleted_count,
    }))
}
