use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::constants::{ERR_INVALID_TOKEN, ERR_NO_TOKEN, ERR_UNSUPPORTED_FILE_TYPE};
use crate::ingest::OcrError;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed to process image via OCR: {0}")]
    Ocr(#[from] OcrError),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    UnsupportedFileType(String),

    #[error("{0}")]
    Upstream(String),

    #[error("Missing or malformed Authorization header")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_)
            | AppError::UnsupportedFileType(_)
            | AppError::Csv(_)
            | AppError::Multipart(_) => StatusCode::BAD_REQUEST,
            AppError::MissingToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Io(_)
            | AppError::TaskJoin(_)
            | AppError::Ocr(_)
            | AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn unsupported_file_type() -> Self {
        AppError::UnsupportedFileType(ERR_UNSUPPORTED_FILE_TYPE.to_string())
    }
}

/// Implement IntoResponse to convert AppError into HTTP responses
///
/// Upstream failures surface their message so callers can see what the
/// database or OCR collaborator rejected.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::MissingToken => json!({ "success": false, "error": ERR_NO_TOKEN }),
            AppError::InvalidToken => json!({ "success": false, "error": ERR_INVALID_TOKEN }),
            AppError::Ocr(ref e) => {
                tracing::error!("OCR error: {}", e);
                let mut body = json!({ "success": false, "error": self.to_string() });
                if let Some((exit_code, stdout, stderr)) = e.diagnostics() {
                    body["exitCode"] = json!(exit_code);
                    body["stdout"] = json!(stdout);
                    body["stderr"] = json!(stderr);
                }
                body
            }
            ref e if status.is_server_error() => {
                tracing::error!("{}", e);
                json!({ "success": false, "error": e.to_string() })
            }
            ref e => json!({ "success": false, "error": e.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for application results
pub type Result<T> = std::result::Result<T, AppError>;
