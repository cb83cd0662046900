use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::constants::{ERR_INVALID_TABLE_NAME, MAX_TABLE_NAME_LEN};
use crate::error::{AppError, Result};

static CREATE_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)CREATE TABLE IF NOT EXISTS (\w+)").unwrap());

/// Accept only `[A-Za-z0-9_]{1,64}` as a caller-supplied table name
pub fn validate_table_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() <= MAX_TABLE_NAME_LEN
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidInput(ERR_INVALID_TABLE_NAME.to_string()))
    }
}

/// Point a script at `table_name`
///
/// The first `CREATE TABLE IF NOT EXISTS <old>` (case-insensitive) is renamed,
/// and every `INSERT INTO <old>` follows it. Scripts without such a clause are
/// returned unchanged.
pub fn rewrite_table_name(sql: &str, table_name: &str) -> Result<String> {
    validate_table_name(table_name)?;

    let Some(old_name) = CREATE_TABLE
        .captures(sql)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
    else {
        return Ok(sql.to_string());
    };

    let replacement = format!("CREATE TABLE IF NOT EXISTS {}", table_name);
    let rewritten = CREATE_TABLE.replace(sql, NoExpand(&replacement));

    let insert = Regex::new(&format!(r"(?i)INSERT INTO {}\b", regex::escape(&old_name)))
        .map_err(|e| AppError::InvalidInput(format!("Cannot rewrite table name: {}", e)))?;
    let insert_replacement = format!("INSERT INTO {}", table_name);

    Ok(insert
        .replace_all(&rewritten, NoExpand(&insert_replacement))
        .into_owned())
}
