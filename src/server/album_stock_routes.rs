//! Album stock routes.
//!
//! Create submissions go through the same upsert handler as updates, keyed by
//! the submitted album.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Form, Json, Router,
};

use crate::catalog::{
    AlbumStockDeleteView, AlbumStockDetailView, AlbumStockFormView, AlbumStockListView,
    CatalogError, CatalogService, DeleteOutcome, FormOutcome,
};
use crate::server::state::ServerState;

use super::FormPairs;

async fn album_stock_list(
    State(catalog): State<CatalogService>,
) -> Result<Json<AlbumStockListView>, CatalogError> {
    Ok(Json(catalog.list_album_stocks().await?))
}

async fn album_stock_detail(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<Json<AlbumStockDetailView>, CatalogError> {
    Ok(Json(catalog.album_stock_detail(&id).await?))
}

async fn album_stock_create_get(
    State(catalog): State<CatalogService>,
) -> Result<Json<AlbumStockFormView>, CatalogError> {
    Ok(Json(catalog.album_stock_create_form().await?))
}

async fn album_stock_edit_get(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<Json<AlbumStockFormView>, CatalogError> {
    Ok(Json(catalog.album_stock_update_form(&id).await?))
}

async fn album_stock_create_post(
    State(catalog): State<CatalogService>,
    Form(form): FormPairs,
) -> Result<FormOutcome<AlbumStockFormView>, CatalogError> {
    catalog.upsert_album_stock(None, form.into()).await
}

async fn album_stock_update_post(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
    Form(form): FormPairs,
) -> Result<FormOutcome<AlbumStockFormView>, CatalogError> {
    catalog.upsert_album_stock(Some(&id), form.into()).await
}

async fn album_stock_delete_get(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<Json<AlbumStockDeleteView>, CatalogError> {
    Ok(Json(catalog.album_stock_delete_form(&id).await?))
}

async fn album_stock_delete_post(
    State(catalog): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<DeleteOutcome<AlbumStockDeleteView>, CatalogError> {
    catalog.delete_album_stock(&id).await
}

/// Build the album stock routes.
///
/// - GET /albumstocks
/// - GET, POST /albumstock/create
/// - GET /albumstock/{id}
/// - GET /albumstock/{id}/edit
/// - POST /albumstock/{id}/update
/// - GET, POST /albumstock/{id}/delete
pub fn album_stock_routes() -> Router<ServerState> {
    Router::new()
        .route("/albumstocks", get(album_stock_list))
        .route(
            "/albumstock/create",
            get(album_stock_create_get).post(album_stock_create_post),
        )
        .route("/albumstock/{id}", get(album_stock_detail))
        .route("/albumstock/{id}/edit", get(album_stock_edit_get))
        .route("/albumstock/{id}/update", post(album_stock_update_post))
        .route(
            "/albumstock/{id}/delete",
            get(album_stock_delete_get).post(album_stock_delete_post),
        )
}
