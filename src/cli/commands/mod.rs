pub mod explain;
pub mod query;
pub mod schema;
