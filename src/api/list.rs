use std::future::Future;

use crate::api::envelope::{PageEnvelope, RawPage};
use crate::config::FilterConfig;
use crate::database::PageQuery;
use crate::filter::{
    EntitySchema, FilterError, FilterParser, PageLimits, PagingBuilder, Predicate, SpecificationBuilder,
    DEFAULT_FILTER_PREFIX,
};

/// Failure of a list request: either the query string was rejected or the
/// fetch itself failed. The fetch error is passed through untouched.
#[derive(Debug)]
pub enum ListError<E> {
    Filter(FilterError),
    Fetch(E),
}

impl<E> From<FilterError> for ListError<E> {
    fn from(err: FilterError) -> Self {
        ListError::Filter(err)
    }
}

/// Reusable list-endpoint adapter: query string in, envelope out.
#[derive(Debug, Clone)]
pub struct ListEndpoint {
    entity: &'static EntitySchema,
    prefix: String,
    limits: PageLimits,
    debug_logging: bool,
}

impl ListEndpoint {
    pub fn new(entity: &'static EntitySchema) -> Self {
        Self {
            entity,
            prefix: DEFAULT_FILTER_PREFIX.to_string(),
            limits: PageLimits::default(),
            debug_logging: false,
        }
    }

    pub fn from_config(entity: &'static EntitySchema, config: &FilterConfig) -> Self {
        Self {
            entity,
            prefix: config.prefix.clone(),
            limits: config.page_limits(),
            debug_logging: config.debug_logging,
        }
    }

    pub fn with_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Builds the combined predicate and validated paging for one request.
    /// `base` is ANDed in front of whatever the query string asks for.
    pub fn prepare(&self, params: &[(String, String)], base: Option<Predicate>) -> Result<PageQuery, FilterError> {
        let filters = FilterParser::extract(params, &self.prefix);
        let requested = SpecificationBuilder::new(self.entity)
            .with_debug_logging(self.debug_logging)
            .build(&filters)?;
        let predicate = Predicate::all(base.into_iter().chain(requested).collect());

        let paging = PagingBuilder::from_query(params, self.limits)?;
        let sort = paging.validate_sort(self.entity)?;

        Ok(PageQuery { predicate, paging, sort })
    }

    /// Invokes `fetch` exactly once and maps each row with `mapper`.
    pub async fn list<T, D, E, F, Fut, M>(
        &self,
        params: &[(String, String)],
        base: Option<Predicate>,
        fetch: F,
        mapper: M,
    ) -> Result<PageEnvelope<D>, ListError<E>>
    where
        F: FnOnce(PageQuery) -> Fut,
        Fut: Future<Output = Result<RawPage<T>, E>>,
        M: FnMut(T) -> D,
    {
        let query = self.prepare(params, base)?;
        let page = fetch(query).await.map_err(ListError::Fetch)?;
        Ok(PageEnvelope::from_page(page, mapper))
    }
}
