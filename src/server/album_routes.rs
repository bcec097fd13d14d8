//! Album routes.

use axum::{
    extract::{Path, State},
    routing::get,
    Form, Json, Router,
};

use crate::catalog::{
    AlbumDeleteView, AlbumDetailView, AlbumFormView, AlbumListView, CatalogError,
    CatalogService, DeleteOutcome, FormOutcome,
};
use crate::server::state::ServerState;

use super::FormPairs;

async fn album_list(
    State(catalog): State<CatalogService>,
) -> Result<Json<AlbumListView>, CatalogError> {
    Ok(Json(catalog.list_albums().await?))
}

async fn album_detail(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<Json<AlbumDetailView>, CatalogError> {
    Ok(Json(catalog.album_detail(&id).await?))
}

async fn album_create_get(
    State(catalog): State<CatalogService>,
) -> Result<Json<AlbumFormView>, CatalogError> {
    Ok(Json(catalog.album_create_form().await?))
}

async fn album_create_post(
    State(catalog): State<CatalogService>,
    Form(form): FormPairs,
) -> Result<FormOutcome<AlbumFormView>, CatalogError> {
    catalog.create_album(form.into()).await
}

async fn album_update_get(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<Json<AlbumFormView>, CatalogError> {
    Ok(Json(catalog.album_update_form(&id).await?))
}

async fn album_update_post(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
    Form(form): FormPairs,
) -> Result<FormOutcome<AlbumFormView>, CatalogError> {
    catalog.update_album(&id, form.into()).await
}

async fn album_delete_get(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<Json<AlbumDeleteView>, CatalogError> {
    Ok(Json(catalog.album_delete_form(&id).await?))
}

async fn album_delete_post(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<DeleteOutcome<AlbumDeleteView>, CatalogError> {
    catalog.delete_album(&id).await
}

/// Build the album routes.
///
/// - GET /albums
/// - GET, POST /album/create
/// - GET /album/{id}
/// - GET, POST /album/{id}/update
/// - GET, POST /album/{id}/delete
pub fn album_routes() -> Router<ServerState> {
    Router::new()
        .route("/albums", get(album_list))
        .route("/album/create", get(album_create_get).post(album_create_post))
        .route("/album/{id}", get(album_detail))
        .route(
            "/album/{id}/update",
            get(album_update_get).post(album_update_post),
        )
        .route(
            "/album/{id}/delete",
            get(album_delete_get).post(album_delete_post),
        )
}
