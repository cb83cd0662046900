use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user query history entry kept in the history store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QueryHistoryRecord {
    pub id: i64,
    pub user_id: String,
    pub query: String,
    pub created_at: DateTime<Utc>,
}

