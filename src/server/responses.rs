//! Mapping of catalog results onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error};

use crate::catalog::{CatalogError, DeleteOutcome, FormOutcome};

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

fn error_response(status: StatusCode, error: &'static str) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        match self {
            CatalogError::NotFound { entity, id } => {
                debug!("{} '{}' not found", entity, id);
                error_response(StatusCode::NOT_FOUND, "Not Found")
            }
            CatalogError::Store(err) => {
                error!("Catalog store failure: {:#}", err);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

impl<V: Serialize> IntoResponse for FormOutcome<V> {
    fn into_response(self) -> Response {
        match self {
            FormOutcome::Saved { url } => Redirect::to(&url).into_response(),
            FormOutcome::Invalid(view) => (StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response(),
        }
    }
}

impl<V: Serialize> IntoResponse for DeleteOutcome<V> {
    fn into_response(self) -> Response {
        match self {
            DeleteOutcome::Deleted { url } => Redirect::to(&url).into_response(),
            DeleteOutcome::Blocked(view) => (StatusCode::CONFLICT, Json(view)).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn saved_redirects_with_see_other() {
        let response = FormOutcome::<()>::Saved {
            url: "/catalog/genre/abc".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/catalog/genre/abc"
        );
    }

    #[test]
    fn outcomes_and_errors_map_to_statuses() {
        assert_eq!(
            FormOutcome::Invalid(()).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            DeleteOutcome::Blocked(()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            CatalogError::not_found("Album", "x").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CatalogError::Store(anyhow::anyhow!("disk I/O error"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
