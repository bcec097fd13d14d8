mod album_routes;
mod album_stock_routes;
mod artist_routes;
pub mod config;
mod genre_routes;
mod http_layers;
mod responses;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server};

/// Url-encoded form body. Repeated keys are kept as separate pairs.
type FormPairs = axum::Form<Vec<(String, String)>>;
