//! SQL Playground Server Library
//!
//! Upload CSV or image files, turn them into SQL scripts, execute scripts
//! against an embedded store, and run per-user queries with history.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod ingest;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod sql;

pub use config::Config;
pub use error::{AppError, Result};

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use db::{HistoryStore, QueryRunner};
use ingest::OcrExtractor;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub history: Arc<dyn HistoryStore>,
    pub runner: Arc<dyn QueryRunner>,
    pub ocr: Arc<dyn OcrExtractor>,
}

impl AppState {
    /// Create a new AppState from configuration and its collaborators
    pub fn new(
        config: Config,
        history: Arc<dyn HistoryStore>,
        runner: Arc<dyn QueryRunner>,
        ocr: Arc<dyn OcrExtractor>,
    ) -> Self {
        Self {
            config,
            history,
            runner,
            ocr,
        }
    }
}

/// Build the full route table
///
/// Query routes sit behind bearer-token auth; upload and execute do not.
pub fn build_router(state: AppState) -> Router {
    use routes::*;

    let protected = Router::new()
        .route("/api/run-query", post(run_query))
        .route("/api/save-query-history", post(save_query_history))
        .route("/api/query-history", get(get_query_history))
        .route("/api/all-queries", get(get_all_queries))
        .route("/api/query-history/clear", delete(clear_query_history))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/upload", post(upload_file))
        .route("/api/execute-sql", post(execute_sql))
        .merge(protected)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .with_state(state)
}
