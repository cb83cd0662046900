use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{InferredColumn, Row};

static NON_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());

/// Replace every run of characters outside `[A-Za-z0-9_]` with `_`
pub fn normalize_identifier(name: &str) -> String {
    NON_IDENTIFIER.replace_all(name, "_").into_owned()
}

/// Table name derived from an uploaded file's base name
pub fn default_table_name(file_stem: &str) -> String {
    normalize_identifier(file_stem)
}

/// Single-quote a text literal, doubling embedded quotes
pub fn quote_text(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Column identifiers for a generated table, one per column
///
/// Blank names become `column_<n>` (1-based position). Names that collide
/// after normalization, compared case-insensitively, get a `_2`, `_3`, ...
/// suffix.
fn column_identifiers(columns: &[InferredColumn]) -> Vec<String> {
    let mut taken = HashSet::new();

    columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let base = match normalize_identifier(column.name.trim()) {
                name if name.is_empty() => format!("column_{}", index + 1),
                name => name,
            };

            let mut candidate = base.clone();
            let mut suffix = 2;
            while !taken.insert(candidate.to_ascii_lowercase()) {
                candidate = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            candidate
        })
        .collect()
}

/// Render one CREATE TABLE and one INSERT per row, newline separated
///
/// Table and column names are interpolated after normalization only.
pub fn generate_script(table_name: &str, columns: &[InferredColumn], rows: &[Row]) -> String {
    let table = normalize_identifier(table_name);
    let names = column_identifiers(columns);

    let definitions = columns
        .iter()
        .zip(&names)
        .map(|(column, name)| format!("{} {}", name, column.column_type))
        .collect::<Vec<_>>()
        .join(",\n  ");

    let mut statements = Vec::with_capacity(rows.len() + 1);
    statements.push(format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n);",
        table, definitions
    ));

    let column_list = names.join(", ");
    for row in rows {
        let values = columns
            .iter()
            .map(|column| match row.get(&column.name) {
                None => "NULL".to_string(),
                Some(value) if column.column_type.is_numeric() => value.to_string(),
                Some(value) => quote_text(value),
            })
            .collect::<Vec<_>>()
            .join(", ");

        statements.push(format!(
            "INSERT INTO {} ({}) VALUES ({});",
            table, column_list, values
        ));
    }

    statements.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnType;
    use crate::sql::infer_columns;

    fn people() -> Vec<Row> {
        vec![
            [("id", "1"), ("name", "Alice")].into_iter().collect(),
            [("id", "2"), ("name", "O'Brien")].into_iter().collect(),
        ]
    }

    #[test]
    fn test_default_table_name() {
        assert_eq!(default_table_name("people"), "people");
        assert_eq!(default_table_name("sales report-2024"), "sales_report_2024");
        assert_eq!(default_table_name("a  &&  b"), "a_b");
    }

    #[test]
    fn test_quote_text_doubles_quotes() {
        assert_eq!(quote_text("O'Brien"), "'O''Brien'");
        assert_eq!(quote_text("''"), "''''''");
        assert_eq!(quote_text(""), "''");
    }

    #[test]
    fn test_generate_script_people() {
        let rows = people();
        let columns = infer_columns(&rows).unwrap();

        let script = generate_script("people", &columns, &rows);

        assert_eq!(
            script,
            "CREATE TABLE IF NOT EXISTS people (\n  id INTEGER,\n  name TEXT\n);\n\
             INSERT INTO people (id, name) VALUES (1, 'Alice');\n\
             INSERT INTO people (id, name) VALUES (2, 'O''Brien');"
        );
    }

    #[test]
    fn test_generate_script_absent_field_is_null() {
        let rows: Vec<Row> = vec![
            [("id", "1"), ("note", "hi")].into_iter().collect(),
            [("id", "2")].into_iter().collect(),
        ];
        let columns = vec![
            InferredColumn::new("id", ColumnType::Integer),
            InferredColumn::new("note", ColumnType::Text),
        ];

        let script = generate_script("notes", &columns, &rows);

        assert!(script.ends_with("INSERT INTO notes (id, note) VALUES (2, NULL);"));
    }

    #[test]
    fn test_generate_script_normalizes_column_names() {
        let rows: Vec<Row> = vec![[("unit price", "2.5")].into_iter().collect()];
        let columns = infer_columns(&rows).unwrap();

        let script = generate_script("items", &columns, &rows);

        assert!(script.contains("unit_price REAL"));
        assert!(script.contains("INSERT INTO items (unit_price) VALUES (2.5);"));
    }

    #[test]
    fn test_generate_script_deduplicates_column_names() {
        let rows: Vec<Row> = vec![[
            ("first name", "Ann"),
            ("first-name", "Bo"),
            ("First_Name", "Cy"),
        ]
        .into_iter()
        .collect()];
        let columns = infer_columns(&rows).unwrap();

        let script = generate_script("names", &columns, &rows);

        assert!(script.starts_with(
            "CREATE TABLE IF NOT EXISTS names (\n  first_name TEXT,\n  first_name_2 TEXT,\n  First_Name_3 TEXT\n);"
        ));
        assert!(script.ends_with(
            "INSERT INTO names (first_name, first_name_2, First_Name_3) VALUES ('Ann', 'Bo', 'Cy');"
        ));
    }

    #[test]
    fn test_generate_script_names_blank_headers() {
        let rows: Vec<Row> = vec![[("id", "1"), ("", "x")].into_iter().collect()];
        let columns = infer_columns(&rows).unwrap();

        let script = generate_script("t", &columns, &rows);

        assert!(script.contains("  column_2 TEXT\n"));
        assert!(script.ends_with("INSERT INTO t (id, column_2) VALUES (1, 'x');"));
    }

    #[test]
    fn test_generate_script_quotes_non_ascii_digits() {
        let rows: Vec<Row> = vec![[("id", "1"), ("code", "١٢٣")].into_iter().collect()];
        let columns = infer_columns(&rows).unwrap();

        let script = generate_script("t", &columns, &rows);

        assert!(script.contains("  code TEXT\n"));
        assert!(script.ends_with("INSERT INTO t (id, code) VALUES (1, '١٢٣');"));
    }
}
