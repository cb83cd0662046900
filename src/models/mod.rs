pub mod column;
pub mod history;
pub mod row;
pub mod upload;

pub use column::{ColumnType, InferredColumn};
pub use history::QueryHistoryRecord;
pub use row::Row;
pub use upload::{FileKind, UploadedFile};
