//! Catalog models for the SQLite-backed store.
//!
//! References between entities are plain ids; expansion into full records
//! ("populate") happens at read time, see [`AlbumListing`] and
//! [`AlbumStockListing`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Generates a fresh opaque entity id.
pub fn new_entity_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Common behavior of catalog entities addressable by URL.
pub trait CatalogEntity {
    /// Path segment used in the entity's canonical URL.
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn url(&self) -> String {
        format!("/catalog/{}/{}", Self::KIND, self.id())
    }
}

// =============================================================================
// Enumerations
// =============================================================================

/// Inventory status of an album stock row.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[default]
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Backorder")]
    Backorder,
}

impl StockStatus {
    pub const ALL: [StockStatus; 3] = [
        StockStatus::InStock,
        StockStatus::OutOfStock,
        StockStatus::Backorder,
    ];

    /// Convert from database string representation
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "In Stock" => Some(StockStatus::InStock),
            "Out of Stock" => Some(StockStatus::OutOfStock),
            "Backorder" => Some(StockStatus::Backorder),
            _ => None,
        }
    }

    /// Parse a submitted form value, ignoring case and surrounding whitespace.
    pub fn from_form_str(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.to_db_str().eq_ignore_ascii_case(s))
    }

    /// Convert to database string representation
    pub fn to_db_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::Backorder => "Backorder",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_db_str())
    }
}

// =============================================================================
// Core Entities
// =============================================================================

/// Artist entity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub legal_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    pub place_of_birth: Option<String>,
}

/// Medium-length date display, e.g. "Oct 24, 1986".
fn format_date_medium(date: &NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

impl Artist {
    pub fn date_of_birth_formatted(&self) -> Option<String> {
        self.date_of_birth.as_ref().map(format_date_medium)
    }

    pub fn date_of_death_formatted(&self) -> Option<String> {
        self.date_of_death.as_ref().map(format_date_medium)
    }

    /// "Oct 24, 1986 - " style lifespan, `None` when nothing is known.
    pub fn lifespan(&self) -> Option<String> {
        match (
            self.date_of_birth_formatted(),
            self.date_of_death_formatted(),
        ) {
            (None, None) => None,
            (birth, death) => Some(format!(
                "{} - {}",
                birth.unwrap_or_default(),
                death.unwrap_or_default()
            )),
        }
    }
}

impl CatalogEntity for Artist {
    const KIND: &'static str = "artist";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Genre entity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
}

impl CatalogEntity for Genre {
    const KIND: &'static str = "genre";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Album entity. `artist_id` and `genre_ids` reference other entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub artist_id: String,
    pub price: f64,
    pub genre_ids: Vec<String>,
}

impl CatalogEntity for Album {
    const KIND: &'static str = "album";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Inventory row for an album. At most one exists per album.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumStock {
    pub id: String,
    pub album_id: String,
    pub num_in_stock: i64,
    pub status: StockStatus,
}

impl CatalogEntity for AlbumStock {
    const KIND: &'static str = "albumstock";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Values applied by an album stock upsert. `None` keeps the stored value,
/// or falls back to the default when a new row is inserted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlbumStockChange {
    pub num_in_stock: Option<i64>,
    pub status: Option<StockStatus>,
}

/// Result of deleting an album together with its stock rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlbumDeletion {
    Deleted,
    NotFound,
    /// Nothing was deleted because stock rows are still In Stock.
    InStock { count: usize },
}

// =============================================================================
// Populated Types
// =============================================================================

/// Album with its artist reference expanded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlbumListing {
    pub album: Album,
    pub artist: Artist,
}

/// Album stock with its album reference expanded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlbumStockListing {
    pub stock: AlbumStock,
    pub album: Album,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artist(dob: Option<&str>, dod: Option<&str>) -> Artist {
        Artist {
            id: "a1".to_string(),
            name: "Prince".to_string(),
            legal_name: None,
            date_of_birth: dob.map(|d| d.parse().unwrap()),
            date_of_death: dod.map(|d| d.parse().unwrap()),
            place_of_birth: None,
        }
    }

    #[test]
    fn formats_dates_only_when_present() {
        let a = artist(Some("1958-06-07"), None);
        assert_eq!(a.date_of_birth_formatted().as_deref(), Some("Jun 7, 1958"));
        assert_eq!(a.date_of_death_formatted(), None);
        assert_eq!(a.lifespan().as_deref(), Some("Jun 7, 1958 - "));

        let a = artist(None, None);
        assert_eq!(a.date_of_birth_formatted(), None);
        assert_eq!(a.lifespan(), None);

        let a = artist(Some("1958-06-07"), Some("2016-04-21"));
        assert_eq!(a.lifespan().as_deref(), Some("Jun 7, 1958 - Apr 21, 2016"));
    }

    #[test]
    fn canonical_urls() {
        assert_eq!(artist(None, None).url(), "/catalog/artist/a1");
        let album = Album {
            id: "x".to_string(),
            title: "1999".to_string(),
            artist_id: "a1".to_string(),
            price: 35.0,
            genre_ids: vec![],
        };
        assert_eq!(album.url(), "/catalog/album/x");
        let stock = AlbumStock {
            id: "s".to_string(),
            album_id: "x".to_string(),
            num_in_stock: 0,
            status: StockStatus::default(),
        };
        assert_eq!(stock.url(), "/catalog/albumstock/s");
    }

    #[test]
    fn stock_status_round_trips_through_db_strings() {
        for status in StockStatus::ALL {
            assert_eq!(StockStatus::from_db_str(status.to_db_str()), Some(status));
        }
        assert_eq!(StockStatus::from_db_str("Lost"), None);
        assert_eq!(
            StockStatus::from_form_str(" in stock "),
            Some(StockStatus::InStock)
        );
        assert_eq!(StockStatus::from_form_str(""), None);
        assert_eq!(StockStatus::default(), StockStatus::OutOfStock);
        assert_eq!(
            serde_json::to_value(StockStatus::InStock).unwrap(),
            serde_json::json!("In Stock")
        );
    }
}
