//! Common test infrastructure
//!
//! This module provides everything the end-to-end tests need.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, TestClient, ALBUM_1_ID};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_get_album() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.get_album(ALBUM_1_ID).await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod constants;
mod fixtures;
mod server;

// Public API - this is what tests import
pub use client::{location, TestClient};
pub use constants::*;
pub use server::TestServer;
