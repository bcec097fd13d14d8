//! Album pages and form handling.

use super::error::{CatalogError, CatalogResult};
use super::guard::{check_album_deletion, RelationshipConflict};
use super::service::{CatalogService, DeleteOutcome, FormOutcome};
use super::validation::{
    unescape, validate, FieldError, FieldKind, FieldSpec, FormData, SanitizedForm, Validated,
};
use super::views::{AlbumView, Link, StockView};
use crate::catalog_store::*;
use serde::Serialize;
use tracing::info;

pub const ALBUM_LIST_URL: &str = "/catalog/albums";

const ALBUM_FORM: &[FieldSpec] = &[
    FieldSpec::new("title", "Title", FieldKind::Required, "Title must not be empty."),
    FieldSpec::new("artist", "Artist", FieldKind::Required, "Artist must not be empty."),
    FieldSpec::new(
        "price",
        "Price",
        FieldKind::Decimal,
        "Price must be a non-negative number.",
    ),
    FieldSpec::new("genre", "Genre", FieldKind::List, ""),
];

#[derive(Debug, Serialize)]
pub struct AlbumListItem {
    pub id: String,
    pub url: String,
    pub title: String,
    pub artist: Link,
}

#[derive(Debug, Serialize)]
pub struct AlbumListView {
    pub title: &'static str,
    pub albums: Vec<AlbumListItem>,
}

#[derive(Debug, Serialize)]
pub struct AlbumDetailView {
    pub title: String,
    pub album: AlbumView,
    pub stocks: Vec<StockView>,
}

#[derive(Debug, Serialize)]
pub struct GenreOption {
    #[serde(flatten)]
    pub genre: Link,
    pub checked: bool,
}

#[derive(Debug, Serialize)]
pub struct AlbumFormView {
    pub title: &'static str,
    pub album: SanitizedForm,
    pub artists: Vec<Link>,
    pub genres: Vec<GenreOption>,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct AlbumDeleteView {
    pub title: &'static str,
    pub album: AlbumView,
    pub stocks: Vec<StockView>,
    pub conflict: Option<String>,
}

fn form_title(id: Option<&str>) -> &'static str {
    if id.is_some() {
        "Update Album"
    } else {
        "Create Album"
    }
}

/// Genre ids in submission order, without repeats.
fn distinct_ids(ids: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(id.clone());
        }
    }
    seen
}

impl CatalogService {
    pub async fn list_albums(&self) -> CatalogResult<AlbumListView> {
        let listings = self.with_store(|store| store.list_albums()).await?;
        Ok(AlbumListView {
            title: "Album List",
            albums: listings
                .iter()
                .map(|listing| AlbumListItem {
                    id: listing.album.id.clone(),
                    url: listing.album.url(),
                    title: listing.album.title.clone(),
                    artist: Link::artist(&listing.artist),
                })
                .collect(),
        })
    }

    /// Load an album together with its stock rows.
    async fn load_album_with_stocks(
        &self,
        id: &str,
    ) -> CatalogResult<(Option<Album>, Vec<AlbumStock>)> {
        let (album_id, stock_album_id) = (id.to_string(), id.to_string());
        tokio::try_join!(
            self.with_store(move |store| store.get_album(&album_id)),
            self.with_store(move |store| store.list_stocks_for_album(&stock_album_id)),
        )
    }

    /// Expand the artist and genre references of `album`.
    async fn album_view(&self, album: &Album) -> CatalogResult<AlbumView> {
        let artist_id = album.artist_id.clone();
        let genre_ids = album.genre_ids.clone();
        let (artist, genres) = tokio::try_join!(
            self.with_store(move |store| store.get_artist(&artist_id)),
            self.with_store(move |store| store.get_genres(&genre_ids)),
        )?;
        Ok(AlbumView::new(album, artist.as_ref(), &genres))
    }

    pub async fn album_detail(&self, id: &str) -> CatalogResult<AlbumDetailView> {
        let (album, stocks) = self.load_album_with_stocks(id).await?;
        let album = album.ok_or_else(|| CatalogError::not_found("Album", id))?;
        let album = self.album_view(&album).await?;
        Ok(AlbumDetailView {
            title: album.title.clone(),
            album,
            stocks: stocks.iter().map(StockView::from).collect(),
        })
    }

    async fn album_form_view(
        &self,
        title: &'static str,
        values: SanitizedForm,
        errors: Vec<FieldError>,
    ) -> CatalogResult<AlbumFormView> {
        let (artists, genres) = tokio::try_join!(
            self.with_store(|store| store.list_artists()),
            self.with_store(|store| store.list_genres()),
        )?;
        let selected = values.list("genre");
        let genres = genres
            .iter()
            .map(|genre| GenreOption {
                genre: Link::genre(genre),
                checked: selected.contains(&genre.id),
            })
            .collect();
        Ok(AlbumFormView {
            title,
            artists: artists.iter().map(Link::artist).collect(),
            genres,
            album: values,
            errors,
        })
    }

    pub async fn album_create_form(&self) -> CatalogResult<AlbumFormView> {
        self.album_form_view(form_title(None), SanitizedForm::default(), Vec::new())
            .await
    }

    pub async fn album_update_form(&self, id: &str) -> CatalogResult<AlbumFormView> {
        let album_id = id.to_string();
        let album = self
            .with_store(move |store| store.get_album(&album_id))
            .await?
            .ok_or_else(|| CatalogError::not_found("Album", id))?;
        let values = SanitizedForm::default()
            .with("title", unescape(&album.title))
            .with("artist", album.artist_id)
            .with("price", album.price.to_string())
            .with_list("genre", album.genre_ids);
        self.album_form_view(form_title(Some(id)), values, Vec::new())
            .await
    }

    /// Report artist and genre references that do not exist.
    async fn check_album_references(&self, validated: &mut Validated) -> CatalogResult<()> {
        let artist_id = validated.values.get("artist").map(str::to_string);
        let requested_genres = distinct_ids(validated.values.list("genre"));
        let genre_ids = requested_genres.clone();

        let (artist, genres) = tokio::try_join!(
            self.with_store(move |store| match artist_id {
                Some(id) => store.get_artist(&id),
                None => Ok(None),
            }),
            self.with_store(move |store| store.get_genres(&genre_ids)),
        )?;

        if validated.values.get("artist").is_some() && artist.is_none() {
            validated.push_error("artist", "Artist not found.");
        }
        for id in requested_genres {
            if !genres.iter().any(|genre| genre.id == id) {
                validated.push_error("genre", format!("Genre '{}' not found.", id));
            }
        }
        Ok(())
    }

    async fn save_album(
        &self,
        id: Option<&str>,
        form: FormData,
    ) -> CatalogResult<FormOutcome<AlbumFormView>> {
        let mut validated = validate(ALBUM_FORM, &form);
        self.check_album_references(&mut validated).await?;

        if !validated.is_valid() {
            let view = self
                .album_form_view(form_title(id), validated.values, validated.errors)
                .await?;
            return Ok(FormOutcome::Invalid(view));
        }

        let values = &validated.values;
        let album = Album {
            id: id.map(str::to_string).unwrap_or_else(new_entity_id),
            title: values.get("title").unwrap_or_default().to_string(),
            artist_id: values.get("artist").unwrap_or_default().to_string(),
            price: values.decimal("price").unwrap_or_default(),
            genre_ids: distinct_ids(values.list("genre")),
        };
        let url = album.url();
        let album_id = album.id.clone();

        let is_update = id.is_some();
        let saved = self
            .with_store(move |store| {
                if is_update {
                    store.update_album(&album)
                } else {
                    store.insert_album(&album).map(|_| true)
                }
            })
            .await?;
        if !saved {
            return Err(CatalogError::not_found("Album", album_id));
        }

        info!(
            "{} album {}",
            if is_update { "Updated" } else { "Created" },
            album_id
        );
        Ok(FormOutcome::Saved { url })
    }

    pub async fn create_album(&self, form: FormData) -> CatalogResult<FormOutcome<AlbumFormView>> {
        self.save_album(None, form).await
    }

    pub async fn update_album(
        &self,
        id: &str,
        form: FormData,
    ) -> CatalogResult<FormOutcome<AlbumFormView>> {
        let album_id = id.to_string();
        if self
            .with_store(move |store| store.get_album(&album_id))
            .await?
            .is_none()
        {
            return Err(CatalogError::not_found("Album", id));
        }
        self.save_album(Some(id), form).await
    }

    pub async fn album_delete_form(&self, id: &str) -> CatalogResult<AlbumDeleteView> {
        let (album, stocks) = self.load_album_with_stocks(id).await?;
        let album = album.ok_or_else(|| CatalogError::not_found("Album", id))?;
        Ok(AlbumDeleteView {
            title: "Delete Album",
            album: self.album_view(&album).await?,
            stocks: stocks.iter().map(StockView::from).collect(),
            conflict: None,
        })
    }

    /// Delete an album and its stock rows unless one of them is In Stock.
    pub async fn delete_album(&self, id: &str) -> CatalogResult<DeleteOutcome<AlbumDeleteView>> {
        let deleted = DeleteOutcome::Deleted {
            url: ALBUM_LIST_URL.to_string(),
        };

        let (album, stocks) = self.load_album_with_stocks(id).await?;
        let Some(album) = album else {
            return Ok(deleted);
        };

        if let Err(conflict) = check_album_deletion(&stocks) {
            info!("Refusing to delete album {}: {}", id, conflict);
            return Ok(DeleteOutcome::Blocked(AlbumDeleteView {
                title: "Delete Album",
                album: self.album_view(&album).await?,
                stocks: stocks.iter().map(StockView::from).collect(),
                conflict: Some(conflict.to_string()),
            }));
        }

        let album_id = id.to_string();
        match self
            .with_store(move |store| store.delete_album_cascade(&album_id))
            .await?
        {
            AlbumDeletion::InStock { count } => {
                // A stock row went In Stock after the check above.
                let conflict = RelationshipConflict::AlbumInStock { count };
                info!("Refusing to delete album {}: {}", id, conflict);
                let (_, stocks) = self.load_album_with_stocks(id).await?;
                Ok(DeleteOutcome::Blocked(AlbumDeleteView {
                    title: "Delete Album",
                    album: self.album_view(&album).await?,
                    stocks: stocks.iter().map(StockView::from).collect(),
                    conflict: Some(conflict.to_string()),
                }))
            }
            AlbumDeletion::Deleted | AlbumDeletion::NotFound => {
                info!("Deleted album {} with {} stock rows", id, stocks.len());
                Ok(deleted)
            }
        }
    }
}
