//! Record Store Catalog Library
//!
//! This library exposes the internal modules for the binaries and the
//! end-to-end tests.

pub mod catalog;
pub mod catalog_store;
pub mod config;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog::CatalogService;
pub use catalog_store::{CatalogStore, SqliteCatalogStore};
pub use server::{run_server, RequestsLoggingLevel};
