use serde::Serialize;

use crate::filter::PagingDescriptor;

/// One page of entities as returned by a store, with paging metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage<T> {
    pub items: Vec<T>,
    pub page_index: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> RawPage<T> {
    /// Derives page counts from the total number of matching rows.
    pub fn from_total(items: Vec<T>, paging: &PagingDescriptor, total_items: u64) -> Self {
        let page_size = paging.page_size.max(1);
        let total_pages = total_items.div_ceil(u64::from(page_size));
        Self {
            items,
            page_index: paging.page_index,
            page_size,
            total_items,
            total_pages,
            first: paging.page_index == 0,
            last: total_pages == 0 || u64::from(paging.page_index) + 1 == total_pages,
        }
    }
}

/// Paginated Result Envelope sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<D> {
    pub items: Vec<D>,
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<D> PageEnvelope<D> {
    /// Maps every row and copies the metadata verbatim.
    pub fn from_page<T, F>(page: RawPage<T>, mapper: F) -> Self
    where
        F: FnMut(T) -> D,
    {
        Self {
            items: page.items.into_iter().map(mapper).collect(),
            page: page.page_index,
            size: page.page_size,
            total_items: page.total_items,
            total_pages: page.total_pages,
            first: page.first,
            last: page.last,
        }
    }
}
