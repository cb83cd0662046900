use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::{ColumnType, InferredColumn, Row};

// ASCII digits only, anything else has to be quoted as text
static INTEGER_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?[0-9]+$").unwrap());
static REAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").unwrap());

/// Classify one column from every value it holds
///
/// All values integral → INTEGER, all numeric with an optional fraction →
/// REAL, anything else → TEXT. A column with no values is TEXT.
pub fn classify<'a, I>(values: I) -> ColumnType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = false;
    let mut all_integer = true;

    for value in values {
        seen = true;
        if INTEGER_PATTERN.is_match(value) {
            continue;
        }
        if REAL_PATTERN.is_match(value) {
            all_integer = false;
            continue;
        }
        return ColumnType::Text;
    }

    match (seen, all_integer) {
        (false, _) => ColumnType::Text,
        (true, true) => ColumnType::Integer,
        (true, false) => ColumnType::Real,
    }
}

/// Infer a typed column list from rows, using the first row's columns
///
/// Absent fields are skipped during classification.
pub fn infer_columns(rows: &[Row]) -> Result<Vec<InferredColumn>> {
    let first = rows
        .first()
        .ok_or_else(|| AppError::InvalidInput("No data rows to infer a schema from".to_string()))?;

    let columns = first
        .columns()
        .map(|name| {
            let column_type = classify(rows.iter().filter_map(|row| row.get(name)));
            InferredColumn::new(name, column_type)
        })
        .collect();

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: Vec<Vec<(&str, &str)>>) -> Vec<Row> {
        data.into_iter()
            .map(|fields| fields.into_iter().collect())
            .collect()
    }

    #[test]
    fn test_classify_integer() {
        assert_eq!(classify(["1", "-20", "300"]), ColumnType::Integer);
    }

    #[test]
    fn test_classify_real_when_any_fraction() {
        assert_eq!(classify(["1", "2.5", "-3"]), ColumnType::Real);
        assert_eq!(classify(["-0.25"]), ColumnType::Real);
    }

    #[test]
    fn test_classify_text_on_any_non_numeric() {
        assert_eq!(classify(["1", "2", "three"]), ColumnType::Text);
        assert_eq!(classify(["1.", "2"]), ColumnType::Text);
        assert_eq!(classify([".5"]), ColumnType::Text);
        assert_eq!(classify(["1e5"]), ColumnType::Text);
        assert_eq!(classify(["", "1"]), ColumnType::Text);
        assert_eq!(classify(["+1"]), ColumnType::Text);
    }

    #[test]
    fn test_classify_non_ascii_digits_are_text() {
        assert_eq!(classify(["١٢٣"]), ColumnType::Text);
        assert_eq!(classify(["1", "٤.٥"]), ColumnType::Text);
        assert_eq!(classify(["１２"]), ColumnType::Text);
    }

    #[test]
    fn test_classify_empty_column_is_text() {
        assert_eq!(classify(Vec::<&str>::new()), ColumnType::Text);
    }

    #[test]
    fn test_infer_columns_uses_first_row_order() {
        let rows = rows(vec![
            vec![("id", "1"), ("name", "Alice"), ("score", "9.5")],
            vec![("id", "2"), ("name", "O'Brien"), ("score", "7")],
        ]);

        let columns = infer_columns(&rows).unwrap();
        assert_eq!(
            columns,
            vec![
                InferredColumn::new("id", ColumnType::Integer),
                InferredColumn::new("name", ColumnType::Text),
                InferredColumn::new("score", ColumnType::Real),
            ]
        );
    }

    #[test]
    fn test_infer_columns_skips_absent_values() {
        let rows = rows(vec![vec![("id", "1"), ("qty", "4")], vec![("id", "2")]]);

        let columns = infer_columns(&rows).unwrap();
        assert_eq!(columns[1], InferredColumn::new("qty", ColumnType::Integer));
    }

    #[test]
    fn test_infer_columns_rejects_empty_input() {
        assert!(matches!(infer_columns(&[]), Err(AppError::InvalidInput(_))));
    }
}
