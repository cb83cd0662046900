/// Maximum accepted multipart body size in bytes (20MB)
/// Transport guard only, file contents are not inspected beyond the extension
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Default wall-clock limit for a single OCR run
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 120;

/// Longest table name accepted by the execute endpoint
pub const MAX_TABLE_NAME_LEN: usize = 64;

/// File name of the embedded SQLite store inside the uploads directory
pub const EMBEDDED_DATABASE_FILE: &str = "database.db";

/// Secret used when JWT_SECRET is absent outside production
pub const DEVELOPMENT_JWT_SECRET: &str = "development-only-jwt-secret";

/// Extensions routed through the CSV pipeline
pub const CSV_EXTENSIONS: &[&str] = &["csv"];

/// Extensions routed through the OCR collaborator
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

// =============================================================================
// Error Messages
// =============================================================================

/// Error message when the multipart body carries no `file` field
pub const ERR_NO_FILE: &str = "No file uploaded";

/// Error message for extensions outside the CSV and image sets
pub const ERR_UNSUPPORTED_FILE_TYPE: &str =
    "Unsupported file type. Only .csv or image files are accepted.";

/// Error message when execute-sql is missing a field
pub const ERR_TABLE_AND_SQL_REQUIRED: &str = "Table name and SQL script are required";

/// Error message for table names outside the identifier allow-list
pub const ERR_INVALID_TABLE_NAME: &str =
    "Table name must be 1-64 characters of letters, digits or underscore";

/// Error message when a query body is empty
pub const ERR_QUERY_REQUIRED: &str = "Query is required";

/// Error message for a missing or non-Bearer Authorization header
pub const ERR_NO_TOKEN: &str = "Access denied. No token provided.";

/// Error message for tokens that fail signature or expiry checks
pub const ERR_INVALID_TOKEN: &str = "Invalid or expired token";
