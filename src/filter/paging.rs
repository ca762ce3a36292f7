use serde::Serialize;

use super::error::FilterError;
use super::schema::{EntitySchema, ResolvedAttribute};
use super::types::{AttributePath, SortDirection};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_SORT_FIELD: &str = "id";

/// Validated page/size/sort bundle for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingDescriptor {
    pub page_index: u32,
    pub page_size: u32,
    pub sort_field: AttributePath,
    pub sort_direction: SortDirection,
}

impl PagingDescriptor {
    pub fn offset(&self) -> u64 {
        u64::from(self.page_index) * u64::from(self.page_size)
    }

    /// Resolves the sort field; unknown or relation-valued fields fail fast.
    pub fn validate_sort(&self, entity: &'static EntitySchema) -> Result<ResolvedAttribute, FilterError> {
        entity
            .resolve_scalar(&self.sort_field)
            .map_err(|_| FilterError::InvalidSortField(self.sort_field.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self { default_size: DEFAULT_PAGE_SIZE, max_size: MAX_PAGE_SIZE }
    }
}

impl PageLimits {
    /// Configured limits can only tighten the hard cap.
    pub fn new(default_size: u32, max_size: u32) -> Self {
        let max_size = max_size.clamp(1, MAX_PAGE_SIZE);
        Self { default_size: default_size.clamp(1, max_size), max_size }
    }
}

pub struct PagingBuilder;

impl PagingBuilder {
    /// Page size is capped, never rejected. A malformed sort path is.
    pub fn build(
        page_index: i64,
        page_size: i64,
        sort_field: &str,
        sort_direction: &str,
    ) -> Result<PagingDescriptor, FilterError> {
        Self::build_with_limits(page_index, page_size, sort_field, sort_direction, PageLimits::default())
    }

    pub fn build_with_limits(
        page_index: i64,
        page_size: i64,
        sort_field: &str,
        sort_direction: &str,
        limits: PageLimits,
    ) -> Result<PagingDescriptor, FilterError> {
        let page_index = u32::try_from(page_index.max(0)).unwrap_or(u32::MAX);
        let page_size = page_size.clamp(1, i64::from(limits.max_size.max(1))) as u32;
        let sort_field =
            AttributePath::parse(sort_field).ok_or_else(|| FilterError::InvalidSortField(sort_field.to_string()))?;

        Ok(PagingDescriptor {
            page_index,
            page_size,
            sort_field,
            sort_direction: SortDirection::parse(sort_direction),
        })
    }

    /// Reads `page`, `size`, `sortBy` and `direction`. Unparsable page, size
    /// and direction fall back to defaults; only an absent or empty `sortBy`
    /// means `id`.
    pub fn from_query(params: &[(String, String)], limits: PageLimits) -> Result<PagingDescriptor, FilterError> {
        let get = |name: &str| {
            params
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };

        let page = get("page").and_then(|v| v.parse::<i64>().ok()).unwrap_or(0);
        let size = get("size")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(i64::from(limits.default_size));
        let sort_by = get("sortBy").filter(|v| !v.is_empty()).unwrap_or(DEFAULT_SORT_FIELD);
        let direction = get("direction").unwrap_or("DESC");

        Self::build_with_limits(page, size, sort_by, direction, limits)
    }
}
