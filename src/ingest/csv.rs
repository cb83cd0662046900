use std::io::Read;
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::models::Row;

/// Parse CSV text into rows keyed by the header line
///
/// Records shorter than the header leave the trailing columns absent.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Row>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .flexible(true)
        .trim(::csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        let row: Row = headers.iter().zip(record.iter()).collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Read and parse a stored CSV upload on the blocking pool
pub async fn read_csv_file(path: PathBuf) -> Result<Vec<Row>> {
    let rows = tokio::task::spawn_blocking(move || -> Result<Vec<Row>> {
        let file = std::fs::File::open(&path)?;
        parse_csv(std::io::BufReader::new(file))
    })
    .await??;

    if rows.is_empty() {
        return Err(AppError::InvalidInput(
            "CSV file contains no data rows".to_string(),
        ));
    }

    tracing::debug!("Parsed {} CSV rows", rows.len());

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_basic() {
        let data = "id,name\n1,Alice\n2,O'Brien\n";
        let rows = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("id"), Some("1"));
        assert_eq!(rows[1].get("name"), Some("O'Brien"));
    }

    #[test]
    fn test_parse_csv_quoted_fields() {
        let data = "id,comment\n1,\"hello, world\"\n2,\"say \"\"hi\"\"\"\n";
        let rows = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(rows[0].get("comment"), Some("hello, world"));
        assert_eq!(rows[1].get("comment"), Some("say \"hi\""));
    }

    #[test]
    fn test_parse_csv_short_record_leaves_absent() {
        let data = "id,name,city\n1,Alice\n";
        let rows = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(rows[0].get("name"), Some("Alice"));
        assert_eq!(rows[0].get("city"), None);
    }

    #[test]
    fn test_parse_csv_header_only() {
        let rows = parse_csv("id,name\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_read_csv_file_rejects_header_only() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "id,name\n").unwrap();

        let result = read_csv_file(path).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
