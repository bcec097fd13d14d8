use axum::extract::FromRef;

use crate::catalog::CatalogService;

use super::ServerConfig;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub catalog: CatalogService,
}

impl FromRef<ServerState> for CatalogService {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
