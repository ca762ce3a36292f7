pub mod builder;
pub mod coerce;
pub mod error;
pub mod eval;
pub mod paging;
pub mod parser;
pub mod predicate;
pub mod schema;
pub mod types;

pub use builder::SpecificationBuilder;
pub use coerce::TypedValue;
pub use error::FilterError;
pub use paging::{PageLimits, PagingBuilder, PagingDescriptor};
pub use parser::{FilterParser, DEFAULT_FILTER_PREFIX};
pub use predicate::{Predicate, PredicateFactory};
pub use schema::{Attribute, EntitySchema, Kind, ResolvedAttribute};
pub use types::*;
