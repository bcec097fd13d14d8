//! Fills a catalog database with a small sample catalog.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::collections::HashMap;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use record_store_catalog::catalog_store::{
    new_entity_id, Album, AlbumStockChange, Artist, CatalogStore, Genre, SqliteCatalogStore,
    StockStatus,
};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite catalog database file, or a SQLite `file:` URI.
    pub db: String,
}

const GENRES: [&str; 4] = ["Rock", "Pop", "Hip Hop", "Rhythm & Blues"];

/// Legal names follow the artist form rule: letters and digits only.
struct ArtistSeed {
    name: &'static str,
    legal_name: Option<&'static str>,
    date_of_birth: Option<&'static str>,
    date_of_death: Option<&'static str>,
}

const ARTISTS: [ArtistSeed; 5] = [
    ArtistSeed {
        name: "Bladee",
        legal_name: Some("BenjaminReichwald"),
        date_of_birth: Some("1994-04-09"),
        date_of_death: None,
    },
    ArtistSeed {
        name: "Drake",
        legal_name: Some("AubreyGraham"),
        date_of_birth: Some("1986-10-24"),
        date_of_death: None,
    },
    ArtistSeed {
        name: "Prince",
        legal_name: None,
        date_of_birth: Some("1958-06-07"),
        date_of_death: Some("2016-04-21"),
    },
    ArtistSeed {
        name: "Björk",
        legal_name: Some("BjörkGuðmundsdóttir"),
        date_of_birth: Some("1965-11-21"),
        date_of_death: None,
    },
    ArtistSeed {
        name: "Aretha Franklin",
        legal_name: None,
        date_of_birth: Some("1942-03-25"),
        date_of_death: Some("2018-08-16"),
    },
];

struct AlbumSeed {
    title: &'static str,
    artist: &'static str,
    price: f64,
    genres: &'static [&'static str],
    num_in_stock: i64,
    status: StockStatus,
}

const ALBUMS: [AlbumSeed; 7] = [
    AlbumSeed {
        title: "The Fool",
        artist: "Bladee",
        price: 29.0,
        genres: &["Hip Hop"],
        num_in_stock: 12,
        status: StockStatus::InStock,
    },
    AlbumSeed {
        title: "Icedancer",
        artist: "Bladee",
        price: 29.0,
        genres: &["Rock"],
        num_in_stock: 25,
        status: StockStatus::InStock,
    },
    AlbumSeed {
        title: "333",
        artist: "Bladee",
        price: 29.0,
        genres: &["Rock"],
        num_in_stock: 0,
        status: StockStatus::OutOfStock,
    },
    AlbumSeed {
        title: "If You're Reading This It's Too Late",
        artist: "Drake",
        price: 35.0,
        genres: &["Hip Hop"],
        num_in_stock: 78,
        status: StockStatus::InStock,
    },
    AlbumSeed {
        title: "1999",
        artist: "Prince",
        price: 35.0,
        genres: &["Pop", "Rock"],
        num_in_stock: 31,
        status: StockStatus::InStock,
    },
    AlbumSeed {
        title: "Post",
        artist: "Björk",
        price: 39.0,
        genres: &["Rock", "Pop"],
        num_in_stock: 67,
        status: StockStatus::InStock,
    },
    AlbumSeed {
        title: "Aretha Now",
        artist: "Aretha Franklin",
        price: 20.0,
        genres: &["Rhythm & Blues"],
        num_in_stock: 0,
        status: StockStatus::Backorder,
    },
];

fn parse_seed_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
    s.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Bad seed date {}", s))
    })
    .transpose()
}

fn lookup<'a>(ids: &'a HashMap<&str, String>, name: &str) -> Result<&'a String> {
    ids.get(name)
        .with_context(|| format!("Unknown seed reference {}", name))
}

fn populate(store: &dyn CatalogStore) -> Result<()> {
    if store.count_albums()? > 0 || store.count_artists()? > 0 || store.count_genres()? > 0 {
        bail!("Catalog database is not empty, refusing to populate it");
    }

    let mut genre_ids = HashMap::new();
    for name in GENRES {
        let genre = Genre {
            id: new_entity_id(),
            name: name.to_string(),
        };
        store.insert_genre(&genre)?;
        info!("Added genre {}", genre.name);
        genre_ids.insert(name, genre.id);
    }

    let mut artist_ids = HashMap::new();
    for seed in &ARTISTS {
        let artist = Artist {
            id: new_entity_id(),
            name: seed.name.to_string(),
            legal_name: seed.legal_name.map(str::to_string),
            date_of_birth: parse_seed_date(seed.date_of_birth)?,
            date_of_death: parse_seed_date(seed.date_of_death)?,
            place_of_birth: None,
        };
        store.insert_artist(&artist)?;
        info!("Added artist {}", artist.name);
        artist_ids.insert(seed.name, artist.id);
    }

    for seed in &ALBUMS {
        let album = Album {
            id: new_entity_id(),
            title: seed.title.to_string(),
            artist_id: lookup(&artist_ids, seed.artist)?.clone(),
            price: seed.price,
            genre_ids: seed
                .genres
                .iter()
                .map(|name| lookup(&genre_ids, name).cloned())
                .collect::<Result<_>>()?,
        };
        store.insert_album(&album)?;

        let change = AlbumStockChange {
            num_in_stock: Some(seed.num_in_stock),
            status: Some(seed.status),
        };
        store.upsert_album_stock(&album.id, &change)?;
        info!(
            "Added album {} with {} in stock ({})",
            album.title, seed.num_in_stock, seed.status
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    info!("Populating catalog database at {}", cli_args.db);
    let store = SqliteCatalogStore::new(&cli_args.db, 1)?;
    populate(&store)?;
    info!("Done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn populates_sample_catalog_once() {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteCatalogStore::new(temp_dir.path().join("catalog.db"), 1).unwrap();

        populate(&store).unwrap();

        assert_eq!(store.count_genres().unwrap(), 4);
        assert_eq!(store.count_artists().unwrap(), 5);
        assert_eq!(store.count_albums().unwrap(), 7);
        assert_eq!(store.count_album_stocks(None).unwrap(), 7);
        assert_eq!(
            store
                .count_album_stocks(Some(StockStatus::InStock))
                .unwrap(),
            5
        );

        let post = store
            .list_albums()
            .unwrap()
            .into_iter()
            .find(|listing| listing.album.title == "Post")
            .unwrap();
        assert_eq!(post.artist.name, "Björk");
        assert_eq!(post.album.genre_ids.len(), 2);

        assert!(populate(&store).is_err());
    }

    #[test]
    fn seeded_legal_names_are_alphanumeric() {
        for seed in &ARTISTS {
            if let Some(legal_name) = seed.legal_name {
                assert!(
                    legal_name.chars().all(char::is_alphanumeric),
                    "{}",
                    legal_name
                );
            }
        }
    }
}
