//! SQL text produced from tabular uploads
//!
//! Inference classifies columns, generation renders the script, rewrite
//! retargets a script at a caller-chosen table before it is executed.

pub mod generate;
pub mod infer;
pub mod rewrite;

pub use generate::{default_table_name, generate_script, normalize_identifier, quote_text};
pub use infer::{classify, infer_columns};
pub use rewrite::{rewrite_table_name, validate_table_name};
