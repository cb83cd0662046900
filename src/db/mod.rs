pub mod embedded;
pub mod history;
pub mod pool;
pub mod query;

pub use embedded::{ensure_database, execute_script};
pub use history::{HistoryStore, PgHistoryStore};
pub use pool::create_pool;
pub use query::{PgQueryRunner, QueryRunner, ResultRow};
