pub mod manager;
pub mod memory;
pub mod query_builder;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use repository::{Entity, PageQuery, PgStore, Store};
