//! Catalog service: page view models, form handling and deletion guards
//! layered over the catalog store.

mod album;
mod album_stock;
mod artist;
mod error;
mod genre;
pub mod guard;
mod service;
mod summary;
pub mod validation;
pub mod views;

pub use album::*;
pub use album_stock::*;
pub use artist::*;
pub use error::{CatalogError, CatalogResult};
pub use genre::*;
pub use service::{CatalogService, DeleteOutcome, FormOutcome};
pub use summary::HomeSummary;
pub use validation::{FieldError, FormData, SanitizedForm};
