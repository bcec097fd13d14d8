//! End-to-end tests for artist endpoints

mod common;

use common::{
    location, TestClient, TestServer, ALBUM_1_ID, ARTIST_1_ID, ARTIST_1_NAME, ARTIST_2_NAME,
    ARTIST_3_ID, ARTIST_3_NAME,
};
use reqwest::StatusCode;

#[tokio::test]
async fn test_artist_list_is_sorted_by_name() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let list: serde_json::Value = client.get_artists().await.json().await.unwrap();
    let names: Vec<&str> = list["artists"]
        .as_array()
        .unwrap()
        .iter()
        .map(|artist| artist["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec![ARTIST_2_NAME, ARTIST_3_NAME, ARTIST_1_NAME]);
}

#[tokio::test]
async fn test_artist_detail_lists_albums() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_artist(ARTIST_1_ID).await;
    assert_eq!(response.status(), StatusCode::OK);

    let detail: serde_json::Value = response.json().await.unwrap();
    assert_eq!(detail["artist"]["name"], ARTIST_1_NAME);
    assert_eq!(detail["artist"]["date_of_birth"], "1958-06-07");
    assert_eq!(detail["albums"][0]["id"], ALBUM_1_ID);
}

#[tokio::test]
async fn test_create_artist_sanitizes_and_redirects() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .create_artist(&[
            ("name", "  Earth, Wind & Fire "),
            ("legal_name", ""),
            ("date_of_birth", ""),
            ("date_of_death", ""),
            ("place_of_birth", "Chicago"),
        ])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let detail: serde_json::Value = client.get(&location(&response)).await.json().await.unwrap();
    assert_eq!(detail["artist"]["name"], "Earth, Wind &amp; Fire");
    assert!(detail["artist"]["legal_name"].is_null());
    assert!(detail["artist"]["date_of_birth"].is_null());
    assert_eq!(detail["artist"]["place_of_birth"], "Chicago");
}

#[tokio::test]
async fn test_create_artist_rejects_bad_fields() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .create_artist(&[
            ("name", "Somebody"),
            ("legal_name", "Some Body"),
            ("date_of_birth", "yesterday"),
        ])
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let form: serde_json::Value = response.json().await.unwrap();
    let messages: Vec<&str> = form["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|error| error["message"].as_str().unwrap())
        .collect();
    assert!(messages.contains(&"Legal name has non-alphanumeric characters."));
    assert!(messages.contains(&"Invalid date of birth."));
    assert_eq!(form["artist"]["name"], "Somebody");
}

#[tokio::test]
async fn test_update_artist() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .update_artist(
            ARTIST_3_ID,
            &[("name", "Somebody Now"), ("date_of_birth", "2001-02-03")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/catalog/artist/{}", ARTIST_3_ID));

    let detail: serde_json::Value = client.get_artist(ARTIST_3_ID).await.json().await.unwrap();
    assert_eq!(detail["artist"]["name"], "Somebody Now");
    assert_eq!(detail["artist"]["date_of_birth_formatted"], "Feb 3, 2001");
}

#[tokio::test]
async fn test_update_nonexistent_artist_returns_404() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .update_artist("nonexistent-artist", &[("name", "Ghost")])
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_artist_with_albums_is_blocked() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.delete_artist(ARTIST_1_ID).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let view: serde_json::Value = response.json().await.unwrap();
    assert_eq!(view["albums"][0]["id"], ALBUM_1_ID);
    assert_eq!(client.get_artist(ARTIST_1_ID).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_artist_without_albums() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.delete_artist(ARTIST_3_ID).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/artists");
    assert_eq!(
        client.get_artist(ARTIST_3_ID).await.status(),
        StatusCode::NOT_FOUND
    );

    // Deleting again is not an error
    let response = client.delete_artist(ARTIST_3_ID).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
