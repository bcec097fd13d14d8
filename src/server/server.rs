use anyhow::{Context, Result};
use std::sync::Arc;

use axum::{
    extract::State,
    middleware,
    response::{IntoResponse, Redirect},
    routing::get,
    Json, Router,
};
use tracing::{error, info};

use crate::catalog::{CatalogError, CatalogService, HomeSummary};
use crate::catalog_store::CatalogStore;

use super::album_routes::album_routes;
use super::album_stock_routes::album_stock_routes;
use super::artist_routes::artist_routes;
use super::genre_routes::genre_routes;
use super::{log_requests, state::ServerState, ServerConfig};

async fn home(
    State(catalog): State<CatalogService>,
) -> Result<Json<HomeSummary>, CatalogError> {
    Ok(Json(catalog.home_summary().await?))
}

async fn redirect_to_catalog() -> impl IntoResponse {
    Redirect::to("/catalog")
}

pub fn make_app(config: ServerConfig, catalog_store: Arc<dyn CatalogStore>) -> Router {
    let state = ServerState {
        config,
        catalog: CatalogService::new(catalog_store),
    };

    let catalog_routes: Router<ServerState> = Router::new()
        .merge(album_routes())
        .merge(artist_routes())
        .merge(genre_routes())
        .merge(album_stock_routes());

    Router::new()
        .route("/", get(redirect_to_catalog))
        .route("/catalog", get(home))
        .nest("/catalog", catalog_routes)
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down..."),
        Err(err) => error!("Failed to listen for Ctrl+C: {}", err),
    }
}

pub async fn run_server(config: ServerConfig, catalog_store: Arc<dyn CatalogStore>) -> Result<()> {
    let address = format!("{}:{}", config.bind_address, config.port);
    let app = make_app(config, catalog_store);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}
