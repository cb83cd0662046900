use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_OCR_TIMEOUT_SECS, DEVELOPMENT_JWT_SECRET,
    EMBEDDED_DATABASE_FILE,
};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub allowed_origins: Vec<String>,
    pub uploads_dir: PathBuf,
    /// Networked relational store targeted by run-query
    pub database_url: String,
    /// Store holding per-user query history
    pub history_database_url: String,
    pub jwt_secret: String,
    pub ocr_interpreter: String,
    pub ocr_script: PathBuf,
    pub ocr_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let uploads_dir =
            PathBuf::from(env::var("UPLOADS_DIR").unwrap_or_else(|_| "./uploads".to_string()));

        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set for run-query")?;
        let history_database_url =
            env::var("HISTORY_DATABASE_URL").unwrap_or_else(|_| database_url.clone());

        let jwt_secret = resolve_jwt_secret(env::var("JWT_SECRET").ok(), &environment)?;

        let ocr_interpreter =
            env::var("OCR_INTERPRETER").unwrap_or_else(|_| "python3".to_string());
        let ocr_script = PathBuf::from(
            env::var("OCR_SCRIPT").unwrap_or_else(|_| "./scripts/image_to_sql.py".to_string()),
        );
        let ocr_timeout_secs = env::var("OCR_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_OCR_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| "Invalid OCR_TIMEOUT_SECS")?;

        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_BYTES.to_string())
            .parse()
            .map_err(|_| "Invalid MAX_UPLOAD_BYTES")?;

        Ok(Config {
            server_host,
            server_port,
            environment,
            allowed_origins,
            uploads_dir,
            database_url,
            history_database_url,
            jwt_secret,
            ocr_interpreter,
            ocr_script,
            ocr_timeout_secs,
            max_upload_bytes,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Path of the embedded SQLite store
    pub fn embedded_database_path(&self) -> PathBuf {
        self.uploads_dir.join(EMBEDDED_DATABASE_FILE)
    }

    pub fn ocr_timeout(&self) -> Duration {
        Duration::from_secs(self.ocr_timeout_secs)
    }
}

/// Pick the token secret, refusing to start in production without one
fn resolve_jwt_secret(configured: Option<String>, environment: &str) -> Result<String, String> {
    match configured.filter(|s| !s.is_empty()) {
        Some(secret) => Ok(secret),
        None if environment.eq_ignore_ascii_case("production") => {
            Err("JWT_SECRET must be set in production".to_string())
        }
        None => {
            tracing::warn!("JWT_SECRET not set, using the development secret");
            Ok(DEVELOPMENT_JWT_SECRET.to_string())
        }
    }
}
