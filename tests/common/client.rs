//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per catalog route. Redirects are not
//! followed so tests can check the `Location` of successful writes.
//!
//! When routes or form fields change, update only this file.

use super::constants::*;
use reqwest::{redirect::Policy, Response};
use std::time::Duration;

/// Form body as ordered key/value pairs; repeated keys form lists.
pub type Form<'a> = [(&'a str, &'a str)];

/// Returns the `Location` header of a redirect response.
///
/// # Panics
///
/// Panics if the header is missing.
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .expect("Response has no Location header")
        .to_str()
        .expect("Location header is not a string")
        .to_string()
}

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// GET an arbitrary path
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST an url-encoded form to an arbitrary path
    pub async fn post_form(&self, path: &str, form: &Form<'_>) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    // ========================================================================
    // Home
    // ========================================================================

    /// GET /catalog
    pub async fn get_home(&self) -> Response {
        self.get("/catalog").await
    }

    // ========================================================================
    // Albums
    // ========================================================================

    /// GET /catalog/albums
    pub async fn get_albums(&self) -> Response {
        self.get("/catalog/albums").await
    }

    /// GET /catalog/album/{id}
    pub async fn get_album(&self, id: &str) -> Response {
        self.get(&format!("/catalog/album/{}", id)).await
    }

    /// POST /catalog/album/create
    pub async fn create_album(&self, form: &Form<'_>) -> Response {
        self.post_form("/catalog/album/create", form).await
    }

    /// POST /catalog/album/{id}/update
    pub async fn update_album(&self, id: &str, form: &Form<'_>) -> Response {
        self.post_form(&format!("/catalog/album/{}/update", id), form)
            .await
    }

    /// POST /catalog/album/{id}/delete
    pub async fn delete_album(&self, id: &str) -> Response {
        self.post_form(&format!("/catalog/album/{}/delete", id), &[])
            .await
    }

    // ========================================================================
    // Artists
    // ========================================================================

    /// GET /catalog/artists
    pub async fn get_artists(&self) -> Response {
        self.get("/catalog/artists").await
    }

    /// GET /catalog/artist/{id}
    pub async fn get_artist(&self, id: &str) -> Response {
        self.get(&format!("/catalog/artist/{}", id)).await
    }

    /// POST /catalog/artist/create
    pub async fn create_artist(&self, form: &Form<'_>) -> Response {
        self.post_form("/catalog/artist/create", form).await
    }

    /// POST /catalog/artist/{id}/update
    pub async fn update_artist(&self, id: &str, form: &Form<'_>) -> Response {
        self.post_form(&format!("/catalog/artist/{}/update", id), form)
            .await
    }

    /// POST /catalog/artist/{id}/delete
    pub async fn delete_artist(&self, id: &str) -> Response {
        self.post_form(&format!("/catalog/artist/{}/delete", id), &[])
            .await
    }

    // ========================================================================
    // Genres
    // ========================================================================

    /// GET /catalog/genres
    pub async fn get_genres(&self) -> Response {
        self.get("/catalog/genres").await
    }

    /// GET /catalog/genre/{id}
    pub async fn get_genre(&self, id: &str) -> Response {
        self.get(&format!("/catalog/genre/{}", id)).await
    }

    /// POST /catalog/genre/create
    pub async fn create_genre(&self, name: &str) -> Response {
        self.post_form("/catalog/genre/create", &[("name", name)])
            .await
    }

    /// POST /catalog/genre/{id}/update
    pub async fn update_genre(&self, id: &str, name: &str) -> Response {
        self.post_form(&format!("/catalog/genre/{}/update", id), &[("name", name)])
            .await
    }

    /// POST /catalog/genre/{id}/delete
    pub async fn delete_genre(&self, id: &str) -> Response {
        self.post_form(&format!("/catalog/genre/{}/delete", id), &[])
            .await
    }

    // ========================================================================
    // Album Stocks
    // ========================================================================

    /// GET /catalog/albumstocks
    pub async fn get_album_stocks(&self) -> Response {
        self.get("/catalog/albumstocks").await
    }

    /// GET /catalog/albumstock/{id}
    pub async fn get_album_stock(&self, id: &str) -> Response {
        self.get(&format!("/catalog/albumstock/{}", id)).await
    }

    /// POST /catalog/albumstock/create
    pub async fn create_album_stock(&self, form: &Form<'_>) -> Response {
        self.post_form("/catalog/albumstock/create", form).await
    }

    /// POST /catalog/albumstock/{id}/update
    pub async fn update_album_stock(&self, id: &str, form: &Form<'_>) -> Response {
        self.post_form(&format!("/catalog/albumstock/{}/update", id), form)
            .await
    }

    /// POST /catalog/albumstock/{id}/delete
    pub async fn delete_album_stock(&self, id: &str) -> Response {
        self.post_form(&format!("/catalog/albumstock/{}/delete", id), &[])
            .await
    }
}
