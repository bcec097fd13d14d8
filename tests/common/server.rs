//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own catalog database.

use super::constants::*;
use super::fixtures::create_test_catalog;
use record_store_catalog::catalog_store::{CatalogStore, SqliteCatalogStore};
use record_store_catalog::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated catalog
///
/// When dropped, the server gracefully shuts down and the temp database is
/// removed.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Catalog store for direct database access in tests
    pub catalog_store: Arc<dyn CatalogStore>,

    // Private fields - keep resources alive until drop
    _temp_catalog_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port, backed by the fixture
    /// catalog.
    ///
    /// # Panics
    ///
    /// Panics if the fixture catalog cannot be created, the port cannot be
    /// bound or the server does not become ready in time.
    pub async fn spawn() -> Self {
        let (temp_catalog_dir, catalog_db_path) =
            create_test_catalog().expect("Failed to create test catalog");

        let catalog_store: Arc<dyn CatalogStore> = Arc::new(
            SqliteCatalogStore::new(&catalog_db_path, 2).expect("Failed to open catalog store"),
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            bind_address: "127.0.0.1".to_string(),
        };
        let app = make_app(config, catalog_store.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            catalog_store,
            _temp_catalog_dir: temp_catalog_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the catalog home
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/catalog", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
