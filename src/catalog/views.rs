//! View models shared by several pages.

use crate::catalog_store::*;
use chrono::NaiveDate;
use serde::Serialize;

/// Reference to another entity as rendered in a page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Link {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl Link {
    pub fn artist(artist: &Artist) -> Self {
        Self {
            id: artist.id.clone(),
            name: artist.name.clone(),
            url: artist.url(),
        }
    }

    pub fn genre(genre: &Genre) -> Self {
        Self {
            id: genre.id.clone(),
            name: genre.name.clone(),
            url: genre.url(),
        }
    }

    pub fn album(album: &Album) -> Self {
        Self {
            id: album.id.clone(),
            name: album.title.clone(),
            url: album.url(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArtistView {
    pub id: String,
    pub url: String,
    pub name: String,
    pub legal_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    pub date_of_birth_formatted: Option<String>,
    pub date_of_death_formatted: Option<String>,
    pub lifespan: Option<String>,
    pub place_of_birth: Option<String>,
}

impl From<&Artist> for ArtistView {
    fn from(artist: &Artist) -> Self {
        Self {
            id: artist.id.clone(),
            url: artist.url(),
            name: artist.name.clone(),
            legal_name: artist.legal_name.clone(),
            date_of_birth: artist.date_of_birth,
            date_of_death: artist.date_of_death,
            date_of_birth_formatted: artist.date_of_birth_formatted(),
            date_of_death_formatted: artist.date_of_death_formatted(),
            lifespan: artist.lifespan(),
            place_of_birth: artist.place_of_birth.clone(),
        }
    }
}

/// Album with its artist and genres expanded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlbumView {
    pub id: String,
    pub url: String,
    pub title: String,
    pub price: f64,
    pub artist: Option<Link>,
    pub genres: Vec<Link>,
}

impl AlbumView {
    pub fn new(album: &Album, artist: Option<&Artist>, genres: &[Genre]) -> Self {
        Self {
            id: album.id.clone(),
            url: album.url(),
            title: album.title.clone(),
            price: album.price,
            artist: artist.map(Link::artist),
            genres: genres.iter().map(Link::genre).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockView {
    pub id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<Link>,
    pub num_in_stock: i64,
    pub status: StockStatus,
}

impl StockView {
    pub fn new(stock: &AlbumStock, album: Option<&Album>) -> Self {
        Self {
            id: stock.id.clone(),
            url: stock.url(),
            album: album.map(Link::album),
            num_in_stock: stock.num_in_stock,
            status: stock.status,
        }
    }
}

impl From<&AlbumStock> for StockView {
    fn from(stock: &AlbumStock) -> Self {
        Self::new(stock, None)
    }
}
