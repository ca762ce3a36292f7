// handlers/mod.rs - HTTP handlers grouped by resource
//
// Every handler is generic over the `Store` backing the list endpoints, so the
// same router serves Postgres in production and the fixture store in tests.
pub mod files;
pub mod lists;
pub mod system;

use std::sync::Arc;

use crate::config::{config, FilterConfig};
use crate::database::Store;
use crate::services::file_metadata::FileMetadataStore;

pub struct AppState<S> {
    pub store: Arc<S>,
    pub files: Arc<FileMetadataStore>,
    pub filter: Arc<FilterConfig>,
}

impl<S: Store> AppState<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            files: Arc::new(FileMetadataStore::new()),
            filter: Arc::new(config().filter.clone()),
        }
    }

    pub fn with_filter_config(mut self, filter: FilterConfig) -> Self {
        self.filter = Arc::new(filter);
        self
    }
}

// Manual impl: `S` itself need not be Clone.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            files: self.files.clone(),
            filter: self.filter.clone(),
        }
    }
}
