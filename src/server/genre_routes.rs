//! Genre routes.

use axum::{
    extract::{Path, State},
    routing::get,
    Form, Json, Router,
};

use crate::catalog::{
    CatalogError, CatalogService, DeleteOutcome, FormOutcome, GenreDeleteView, GenreDetailView,
    GenreFormView, GenreListView,
};
use crate::server::state::ServerState;

use super::FormPairs;

async fn genre_list(
    State(catalog): State<CatalogService>,
) -> Result<Json<GenreListView>, CatalogError> {
    Ok(Json(catalog.list_genres().await?))
}

async fn genre_detail(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<Json<GenreDetailView>, CatalogError> {
    Ok(Json(catalog.genre_detail(&id).await?))
}

async fn genre_create_get(
    State(catalog): State<CatalogService>,
) -> Result<Json<GenreFormView>, CatalogError> {
    Ok(Json(catalog.genre_create_form().await?))
}

async fn genre_create_post(
    State(catalog): State<CatalogService>,
    Form(form): FormPairs,
) -> Result<FormOutcome<GenreFormView>, CatalogError> {
    catalog.create_genre(form.into()).await
}

async fn genre_update_get(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<Json<GenreFormView>, CatalogError> {
    Ok(Json(catalog.genre_update_form(&id).await?))
}

async fn genre_update_post(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
    Form(form): FormPairs,
) -> Result<FormOutcome<GenreFormView>, CatalogError> {
    catalog.update_genre(&id, form.into()).await
}

async fn genre_delete_get(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<Json<GenreDeleteView>, CatalogError> {
    Ok(Json(catalog.genre_delete_form(&id).await?))
}

async fn genre_delete_post(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<DeleteOutcome<GenreDeleteView>, CatalogError> {
    catalog.delete_genre(&id).await
}

/// Build the genre routes.
///
/// - GET /genres
/// - GET, POST /genre/create
/// - GET /genre/{id}
/// - GET, POST /genre/{id}/update
/// - GET, POST /genre/{id}/delete
pub fn genre_routes() -> Router<ServerState> {
    Router::new()
        .route("/genres", get(genre_list))
        .route("/genre/create", get(genre_create_get).post(genre_create_post))
        .route("/genre/{id}", get(genre_detail))
        .route(
            "/genre/{id}/update",
            get(genre_update_get).post(genre_update_post),
        )
        .route(
            "/genre/{id}/delete",
            get(genre_delete_get).post(genre_delete_post),
        )
}
