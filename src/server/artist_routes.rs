//! Artist routes.

use axum::{
    extract::{Path, State},
    routing::get,
    Form, Json, Router,
};

use crate::catalog::{
    ArtistDeleteView, ArtistDetailView, ArtistFormView, ArtistListView, CatalogError,
    CatalogService, DeleteOutcome, FormOutcome,
};
use crate::server::state::ServerState;

use super::FormPairs;

async fn artist_list(
    State(catalog): State<CatalogService>,
) -> Result<Json<ArtistListView>, CatalogError> {
    Ok(Json(catalog.list_artists().await?))
}

async fn artist_detail(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<Json<ArtistDetailView>, CatalogError> {
    Ok(Json(catalog.artist_detail(&id).await?))
}

async fn artist_create_get(
    State(catalog): State<CatalogService>,
) -> Result<Json<ArtistFormView>, CatalogError> {
    Ok(Json(catalog.artist_create_form().await?))
}

async fn artist_create_post(
    State(catalog): State<CatalogService>,
    Form(form): FormPairs,
) -> Result<FormOutcome<ArtistFormView>, CatalogError> {
    catalog.create_artist(form.into()).await
}

async fn artist_update_get(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<Json<ArtistFormView>, CatalogError> {
    Ok(Json(catalog.artist_update_form(&id).await?))
}

async fn artist_update_post(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
    Form(form): FormPairs,
) -> Result<FormOutcome<ArtistFormView>, CatalogError> {
    catalog.update_artist(&id, form.into()).await
}

async fn artist_delete_get(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<Json<ArtistDeleteView>, CatalogError> {
    Ok(Json(catalog.artist_delete_form(&id).await?))
}

async fn artist_delete_post(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<DeleteOutcome<ArtistDeleteView>, CatalogError> {
    catalog.delete_artist(&id).await
}

/// Build the artist routes.
///
/// - GET /artists
/// - GET, POST /artist/create
/// - GET /artist/{id}
/// - GET, POST /artist/{id}/update
/// - GET, POST /artist/{id}/delete
pub fn artist_routes() -> Router<ServerState> {
    Router::new()
        .route("/artists", get(artist_list))
        .route("/artist/create", get(artist_create_get).post(artist_create_post))
        .route("/artist/{id}", get(artist_detail))
        .route(
            "/artist/{id}/update",
            get(artist_update_get).post(artist_update_post),
        )
        .route(
            "/artist/{id}/delete",
            get(artist_delete_get).post(artist_delete_post),
        )
}
