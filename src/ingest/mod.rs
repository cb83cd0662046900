//! Turning uploaded files into rows or SQL scripts

pub mod csv;
pub mod ocr;

pub use self::csv::{parse_csv, read_csv_file};
pub use self::ocr::{CommandOcr, OcrError, OcrExtractor};
