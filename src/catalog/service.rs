//! Catalog service core.
//!
//! The per-entity operations live in sibling modules as further `impl
//! CatalogService` blocks; this module holds the shared plumbing.

use super::error::CatalogResult;
use crate::catalog_store::CatalogStore;
use std::sync::Arc;

/// Result of a create or update submission.
#[derive(Debug)]
pub enum FormOutcome<V> {
    /// Persisted; the caller should continue at the entity's canonical URL.
    Saved { url: String },
    /// Validation failed and nothing was written.
    Invalid(V),
}

/// Result of a delete submission.
#[derive(Debug)]
pub enum DeleteOutcome<V> {
    /// Gone (or already gone); the caller should continue at the list URL.
    Deleted { url: String },
    /// Dependents still reference the entity and nothing was deleted.
    Blocked(V),
}

/// Orchestrates store reads and writes with validation and deletion guards.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Run a store call on the blocking pool.
    pub(crate) async fn with_store<T, F>(&self, f: F) -> CatalogResult<T>
    where
        F: FnOnce(&dyn CatalogStore) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        let result = tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(anyhow::Error::from)?;
        Ok(result?)
    }
}
