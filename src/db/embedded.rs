use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{Connection, Executor};

use crate::error::Result;

const CREATE_HISTORY_TABLE: &str = "CREATE TABLE IF NOT EXISTS query_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    table_name TEXT,
    query TEXT,
    executed_at DATETIME DEFAULT CURRENT_TIMESTAMP
)";

async fn connect(path: &Path) -> Result<SqliteConnection> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    Ok(SqliteConnection::connect_with(&options).await?)
}

async fn close(conn: SqliteConnection) {
    if let Err(e) = conn.close().await {
        tracing::warn!("Error closing embedded database connection: {}", e);
    }
}

/// Make sure the embedded database file and its directory exist
pub async fn ensure_database(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let conn = connect(path).await?;
    close(conn).await;

    tracing::info!("Embedded database initialized at {:?}", path);
    Ok(())
}

/// Run a script as one batch, then record it in the embedded history table
///
/// History is only appended when the script succeeds. Concurrent calls against
/// the same file are not isolated from each other.
pub async fn execute_script(path: &Path, table_name: &str, sql: &str) -> Result<()> {
    let mut conn = connect(path).await?;
    let outcome = run_and_record(&mut conn, table_name, sql).await;
    close(conn).await;

    match &outcome {
        Ok(()) => tracing::info!("SQL executed successfully for table {}", table_name),
        Err(e) => tracing::error!("Error executing SQL for table {}: {}", table_name, e),
    }

    outcome
}

async fn run_and_record(conn: &mut SqliteConnection, table_name: &str, sql: &str) -> Result<()> {
    (&mut *conn).execute(sql).await?;
    (&mut *conn).execute(CREATE_HISTORY_TABLE).await?;

    sqlx::query("INSERT INTO query_history (table_name, query) VALUES (?, ?)")
        .bind(table_name)
        .bind(sql)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;
    use tempfile::TempDir;

    /// (table_name, query, executed_at), newest first
    async fn history_rows(path: &Path) -> Vec<(String, String, String)> {
        let mut conn = connect(path).await.unwrap();
        (&mut conn).execute(CREATE_HISTORY_TABLE).await.unwrap();
        let rows = sqlx::query(
            "SELECT table_name, query, CAST(executed_at AS TEXT) AS executed_at \
             FROM query_history ORDER BY id DESC",
        )
        .fetch_all(&mut conn)
        .await
        .unwrap();
        close(conn).await;

        rows.iter()
            .map(|r| (r.get("table_name"), r.get("query"), r.get("executed_at")))
            .collect()
    }

    #[tokio::test]
    async fn test_ensure_database_creates_file_and_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("database.db");

        ensure_database(&path).await.unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_execute_script_runs_batch_and_records_history() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.db");
        let script = "CREATE TABLE IF NOT EXISTS people (\n  id INTEGER,\n  name TEXT\n);\n\
                      INSERT INTO people (id, name) VALUES (1, 'Alice');\n\
                      INSERT INTO people (id, name) VALUES (2, 'O''Brien');";

        execute_script(&path, "people", script).await.unwrap();

        let mut conn = connect(&path).await.unwrap();
        let rows = sqlx::query("SELECT id, name FROM people ORDER BY id")
            .fetch_all(&mut conn)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get::<String, _>("name"), "O'Brien");
        close(conn).await;

        let history = history_rows(&path).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].0, "people");
        assert_eq!(history[0].1, script);
        assert!(!history[0].2.is_empty());
    }

    #[tokio::test]
    async fn test_execute_script_failure_skips_history() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.db");

        let result = execute_script(&path, "broken", "CREATE TABLE (oops;").await;
        assert!(result.is_err());

        assert!(history_rows(&path).await.is_empty());
    }
}
