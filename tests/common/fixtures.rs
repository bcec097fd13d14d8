//! Test fixture creation for the catalog database

use super::constants::*;
use anyhow::Result;
use chrono::NaiveDate;
use record_store_catalog::catalog_store::{
    Album, AlbumStockChange, Artist, CatalogStore, Genre, SqliteCatalogStore, StockStatus,
};
use std::path::PathBuf;
use tempfile::TempDir;

fn genre(id: &str, name: &str) -> Genre {
    Genre {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn artist(id: &str, name: &str, date_of_birth: Option<NaiveDate>) -> Artist {
    Artist {
        id: id.to_string(),
        name: name.to_string(),
        legal_name: None,
        date_of_birth,
        date_of_death: None,
        place_of_birth: None,
    }
}

/// Creates a temporary catalog with 3 genres, 3 artists, 2 albums and
/// 2 stock rows. Returns (temp_dir, catalog_db_path).
pub fn create_test_catalog() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let catalog_db_path = dir.path().join("catalog.db");
    let store = SqliteCatalogStore::new(&catalog_db_path, 1)?;

    store.insert_genre(&genre(GENRE_ROCK_ID, GENRE_ROCK_NAME))?;
    store.insert_genre(&genre(GENRE_POP_ID, GENRE_POP_NAME))?;
    store.insert_genre(&genre(GENRE_UNUSED_ID, GENRE_UNUSED_NAME))?;

    store.insert_artist(&artist(
        ARTIST_1_ID,
        ARTIST_1_NAME,
        NaiveDate::from_ymd_opt(1958, 6, 7),
    ))?;
    store.insert_artist(&artist(
        ARTIST_2_ID,
        ARTIST_2_NAME,
        NaiveDate::from_ymd_opt(1942, 3, 25),
    ))?;
    store.insert_artist(&artist(ARTIST_3_ID, ARTIST_3_NAME, None))?;

    store.insert_album(&Album {
        id: ALBUM_1_ID.to_string(),
        title: ALBUM_1_TITLE.to_string(),
        artist_id: ARTIST_1_ID.to_string(),
        price: 35.0,
        genre_ids: vec![GENRE_POP_ID.to_string(), GENRE_ROCK_ID.to_string()],
    })?;
    store.insert_album(&Album {
        id: ALBUM_2_ID.to_string(),
        title: ALBUM_2_TITLE.to_string(),
        artist_id: ARTIST_2_ID.to_string(),
        price: 20.0,
        genre_ids: vec![GENRE_POP_ID.to_string()],
    })?;

    store.upsert_album_stock(
        ALBUM_1_ID,
        &AlbumStockChange {
            num_in_stock: Some(ALBUM_1_IN_STOCK),
            status: Some(StockStatus::InStock),
        },
    )?;
    store.upsert_album_stock(
        ALBUM_2_ID,
        &AlbumStockChange {
            num_in_stock: Some(0),
            status: Some(StockStatus::Backorder),
        },
    )?;

    Ok((dir, catalog_db_path))
}
