use thiserror::Error;

/// Failures that end a catalog request abnormally.
///
/// Validation failures and relationship conflicts are not errors: they are
/// reported through [`super::FormOutcome`] and [`super::DeleteOutcome`].
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CatalogError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
