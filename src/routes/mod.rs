pub mod execute;
pub mod health;
pub mod query;
pub mod upload;

pub use execute::execute_sql;
pub use health::{health_check, root};
pub use query::{clear_query_history, get_all_queries, get_query_history, run_query, save_query_history};
pub use upload::upload_file;
