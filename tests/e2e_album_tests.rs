//! End-to-end tests for album endpoints

mod common;

use common::{
    location, TestClient, TestServer, ALBUM_1_ID, ALBUM_1_IN_STOCK, ALBUM_1_TITLE, ALBUM_2_ID,
    ALBUM_2_TITLE, ARTIST_1_ID, ARTIST_1_NAME, GENRE_POP_ID, GENRE_ROCK_ID,
};
use reqwest::StatusCode;

#[tokio::test]
async fn test_album_list_is_sorted_by_title() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_albums().await;
    assert_eq!(response.status(), StatusCode::OK);

    let list: serde_json::Value = response.json().await.unwrap();
    let titles: Vec<&str> = list["albums"]
        .as_array()
        .unwrap()
        .iter()
        .map(|album| album["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec![ALBUM_1_TITLE, ALBUM_2_TITLE]);
    assert_eq!(list["albums"][0]["artist"]["name"], ARTIST_1_NAME);
}

#[tokio::test]
async fn test_album_detail_expands_references() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_album(ALBUM_1_ID).await;
    assert_eq!(response.status(), StatusCode::OK);

    let detail: serde_json::Value = response.json().await.unwrap();
    assert_eq!(detail["album"]["title"], ALBUM_1_TITLE);
    assert_eq!(detail["album"]["artist"]["id"], ARTIST_1_ID);
    assert_eq!(detail["album"]["genres"].as_array().unwrap().len(), 2);
    assert_eq!(detail["stocks"][0]["num_in_stock"], ALBUM_1_IN_STOCK);
    assert_eq!(detail["stocks"][0]["status"], "In Stock");
}

#[tokio::test]
async fn test_get_nonexistent_album_returns_404() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_album("nonexistent-album").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_album_redirects_to_detail() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .create_album(&[
            ("title", "Purple Rain"),
            ("artist", ARTIST_1_ID),
            ("price", "24.5"),
            ("genre", GENRE_ROCK_ID),
            ("genre", GENRE_POP_ID),
        ])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let url = location(&response);
    assert!(url.starts_with("/catalog/album/"));

    let detail: serde_json::Value = client.get(&url).await.json().await.unwrap();
    assert_eq!(detail["album"]["title"], "Purple Rain");
    assert_eq!(detail["album"]["price"], 24.5);
    assert_eq!(detail["album"]["genres"][0]["id"], GENRE_ROCK_ID);
    assert_eq!(detail["album"]["genres"][1]["id"], GENRE_POP_ID);
    assert_eq!(detail["stocks"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_album_with_missing_fields_is_rejected() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .create_album(&[("title", "  "), ("artist", ARTIST_1_ID), ("price", "-3")])
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let form: serde_json::Value = response.json().await.unwrap();
    let fields: Vec<&str> = form["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|error| error["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"price"));

    let summary: serde_json::Value = client.get_home().await.json().await.unwrap();
    assert_eq!(summary["album_count"], 2);
}

#[tokio::test]
async fn test_create_album_with_unknown_artist_is_rejected() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .create_album(&[("title", "Ghost"), ("artist", "nobody"), ("price", "10")])
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let form: serde_json::Value = response.json().await.unwrap();
    assert_eq!(form["errors"][0]["field"], "artist");
    assert_eq!(form["errors"][0]["message"], "Artist not found.");
}

#[tokio::test]
async fn test_update_album_replaces_fields() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .update_album(
            ALBUM_2_ID,
            &[
                ("title", "Aretha Now (Remastered)"),
                ("artist", ARTIST_1_ID),
                ("price", "22"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/catalog/album/{}", ALBUM_2_ID));

    let detail: serde_json::Value = client.get_album(ALBUM_2_ID).await.json().await.unwrap();
    assert_eq!(detail["album"]["title"], "Aretha Now (Remastered)");
    assert_eq!(detail["album"]["artist"]["id"], ARTIST_1_ID);
    assert_eq!(detail["album"]["genres"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_update_form_marks_selected_genres() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .get(&format!("/catalog/album/{}/update", ALBUM_2_ID))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let form: serde_json::Value = response.json().await.unwrap();
    assert_eq!(form["title"], "Update Album");
    for option in form["genres"].as_array().unwrap() {
        assert_eq!(option["checked"], option["id"] == GENRE_POP_ID);
    }
}

#[tokio::test]
async fn test_delete_album_with_stock_in_hand_is_blocked() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.delete_album(ALBUM_1_ID).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let view: serde_json::Value = response.json().await.unwrap();
    assert!(view["conflict"].as_str().unwrap().contains("In Stock"));
    assert_eq!(client.get_album(ALBUM_1_ID).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_album_removes_its_stock_rows() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.delete_album(ALBUM_2_ID).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/albums");

    assert_eq!(
        client.get_album(ALBUM_2_ID).await.status(),
        StatusCode::NOT_FOUND
    );
    assert!(server
        .catalog_store
        .list_stocks_for_album(ALBUM_2_ID)
        .unwrap()
        .is_empty());
}
