use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow, PgPool};

use crate::api::envelope::RawPage;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::query_builder::QueryBuilder;
use crate::filter::{EntitySchema, PagingDescriptor, Predicate, ResolvedAttribute};

/// What a store needs to produce one page: the combined filter (or none),
/// paging, and the already-resolved sort attribute.
#[derive(Debug, Clone)]
pub struct PageQuery {
    pub predicate: Option<Predicate>,
    pub paging: PagingDescriptor,
    pub sort: ResolvedAttribute,
}

/// A persisted entity with a static attribute registry.
///
/// Rows serialize to JSON objects keyed by the registry's attribute names,
/// which is what the in-memory store evaluates predicates against.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    fn schema() -> &'static EntitySchema;
}

#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn fetch_page<T: Entity>(&self, query: &PageQuery) -> Result<RawPage<T>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    fn backend(&self) -> &'static str;
}

/// Postgres-backed store; predicates are lowered to SQL.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn fetch_page<T: Entity>(&self, query: &PageQuery) -> Result<RawPage<T>, DatabaseError> {
        let builder = QueryBuilder::<T>::new(T::schema())
            .filter(query.predicate.as_ref())
            .order(&query.sort, query.paging.sort_direction)
            .page(query.paging.page_size, query.paging.offset());

        let total = builder.count(&self.pool).await?;
        let items = builder.select_all(&self.pool).await?;
        let total = u64::try_from(total).map_err(|_| DatabaseError::QueryError(format!("negative count {}", total)))?;

        Ok(RawPage::from_total(items, &query.paging, total))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
