use super::error::{CatalogError, CatalogResult};
use super::guard::check_artist_deletion;
use super::service::{CatalogService, DeleteOutcome, FormOutcome};
use super::validation::{
    unescape, validate, Check, FieldError, FieldKind, FieldSpec, FormData, SanitizedForm,
    DATE_FORMAT,
};
use super::views::{ArtistView, Link};
use crate::catalog_store::*;
use serde::Serialize;
use tracing::info;

pub const ARTIST_LIST_URL: &str = "/catalog/artists";

const NAME_CHECKS: &[Check] = &[Check::MaxLength(100)];
const LEGAL_NAME_CHECKS: &[Check] = &[Check::MaxLength(100), Check::Alphanumeric];

const ARTIST_FORM: &[FieldSpec] = &[
    FieldSpec::new("name", "Name", FieldKind::Required, "Name must not be empty.")
        .with_checks(NAME_CHECKS),
    FieldSpec::new("legal_name", "Legal name", FieldKind::Optional, "")
        .with_checks(LEGAL_NAME_CHECKS),
    FieldSpec::new(
        "date_of_birth",
        "Date of birth",
        FieldKind::Date,
        "Invalid date of birth.",
    ),
    FieldSpec::new(
        "date_of_death",
        "Date of death",
        FieldKind::Date,
        "Invalid date of death.",
    ),
    FieldSpec::new("place_of_birth", "Place of birth", FieldKind::Optional, "")
        .with_checks(NAME_CHECKS),
];

#[derive(Debug, Serialize)]
pub struct ArtistListView {
    pub title: &'static str,
    pub artists: Vec<ArtistView>,
}

#[derive(Debug, Serialize)]
pub struct ArtistDetailView {
    pub title: String,
    pub artist: ArtistView,
    pub albums: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub struct ArtistFormView {
    pub title: &'static str,
    pub artist: SanitizedForm,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct ArtistDeleteView {
    pub title: &'static str,
    pub artist: ArtistView,
    pub albums: Vec<Link>,
    pub conflict: Option<String>,
}

fn form_title(id: Option<&str>) -> &'static str {
    if id.is_some() {
        "Update Artist"
    } else {
        "Create Artist"
    }
}

fn artist_form_values(artist: &Artist) -> SanitizedForm {
    let date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    };
    let text = |s: Option<&String>| s.map(|s| unescape(s)).unwrap_or_default();
    SanitizedForm::default()
        .with("name", unescape(&artist.name))
        .with("legal_name", text(artist.legal_name.as_ref()))
        .with("date_of_birth", date(artist.date_of_birth))
        .with("date_of_death", date(artist.date_of_death))
        .with("place_of_birth", text(artist.place_of_birth.as_ref()))
}

impl CatalogService {
    pub async fn list_artists(&self) -> CatalogResult<ArtistListView> {
        let artists = self.with_store(|store| store.list_artists()).await?;
        Ok(ArtistListView {
            title: "Artist List",
            artists: artists.iter().map(ArtistView::from).collect(),
        })
    }

    async fn load_artist_with_albums(
        &self,
        id: &str,
    ) -> CatalogResult<(Option<Artist>, Vec<Album>)> {
        let (artist_id, albums_artist_id) = (id.to_string(), id.to_string());
        tokio::try_join!(
            self.with_store(move |store| store.get_artist(&artist_id)),
            self.with_store(move |store| store.list_albums_by_artist(&albums_artist_id)),
        )
    }

    pub async fn artist_detail(&self, id: &str) -> CatalogResult<ArtistDetailView> {
        let (artist, albums) = self.load_artist_with_albums(id).await?;
        let artist = artist.ok_or_else(|| CatalogError::not_found("Artist", id))?;
        Ok(ArtistDetailView {
            title: artist.name.clone(),
            artist: ArtistView::from(&artist),
            albums: albums.iter().map(Link::album).collect(),
        })
    }

    pub async fn artist_create_form(&self) -> CatalogResult<ArtistFormView> {
        Ok(ArtistFormView {
            title: form_title(None),
            artist: SanitizedForm::default(),
            errors: Vec::new(),
        })
    }

    pub async fn artist_update_form(&self, id: &str) -> CatalogResult<ArtistFormView> {
        let artist_id = id.to_string();
        let artist = self
            .with_store(move |store| store.get_artist(&artist_id))
            .await?
            .ok_or_else(|| CatalogError::not_found("Artist", id))?;
        Ok(ArtistFormView {
            title: form_title(Some(id)),
            artist: artist_form_values(&artist),
            errors: Vec::new(),
        })
    }

    async fn save_artist(
        &self,
        id: Option<&str>,
        form: FormData,
    ) -> CatalogResult<FormOutcome<ArtistFormView>> {
        let validated = validate(ARTIST_FORM, &form);
        if !validated.is_valid() {
            return Ok(FormOutcome::Invalid(ArtistFormView {
                title: form_title(id),
                artist: validated.values,
                errors: validated.errors,
            }));
        }

        let values = &validated.values;
        let artist = Artist {
            id: id.map(str::to_string).unwrap_or_else(new_entity_id),
            name: values.get("name").unwrap_or_default().to_string(),
            legal_name: values.get("legal_name").map(str::to_string),
            date_of_birth: values.date("date_of_birth"),
            date_of_death: values.date("date_of_death"),
            place_of_birth: values.get("place_of_birth").map(str::to_string),
        };
        let url = artist.url();
        let artist_id = artist.id.clone();

        let is_update = id.is_some();
        let saved = self
            .with_store(move |store| {
                if is_update {
                    store.update_artist(&artist)
                } else {
                    store.insert_artist(&artist).map(|_| true)
                }
            })
            .await?;
        if !saved {
            return Err(CatalogError::not_found("Artist", artist_id));
        }

        info!(
            "{} artist {}",
            if is_update { "Updated" } else { "Created" },
            artist_id
        );
        Ok(FormOutcome::Saved { url })
    }

    pub async fn create_artist(
        &self,
        form: FormData,
    ) -> CatalogResult<FormOutcome<ArtistFormView>> {
        self.save_artist(None, form).await
    }

    pub async fn update_artist(
        &self,
        id: &str,
        form: FormData,
    ) -> CatalogResult<FormOutcome<ArtistFormView>> {
        let artist_id = id.to_string();
        if self
            .with_store(move |store| store.get_artist(&artist_id))
            .await?
            .is_none()
        {
            return Err(CatalogError::not_found("Artist", id));
        }
        self.save_artist(Some(id), form).await
    }

    pub async fn artist_delete_form(&self, id: &str) -> CatalogResult<ArtistDeleteView> {
        let (artist, albums) = self.load_artist_with_albums(id).await?;
        let artist = artist.ok_or_else(|| CatalogError::not_found("Artist", id))?;
        Ok(ArtistDeleteView {
            title: "Delete Artist",
            artist: ArtistView::from(&artist),
            albums: albums.iter().map(Link::album).collect(),
            conflict: None,
        })
    }

    /// Delete an artist that no album references.
    pub async fn delete_artist(
        &self,
        id: &str,
    ) -> CatalogResult<DeleteOutcome<ArtistDeleteView>> {
        let deleted = DeleteOutcome::Deleted {
            url: ARTIST_LIST_URL.to_string(),
        };

        let (artist, albums) = self.load_artist_with_albums(id).await?;
        let Some(artist) = artist else {
            return Ok(deleted);
        };

        if let Err(conflict) = check_artist_deletion(&albums) {
            info!("Refusing to delete artist {}: {}", id, conflict);
            return Ok(DeleteOutcome::Blocked(ArtistDeleteView {
                title: "Delete Artist",
                artist: ArtistView::from(&artist),
                albums: albums.iter().map(Link::album).collect(),
                conflict: Some(conflict.to_string()),
            }));
        }

        let artist_id = id.to_string();
        self.with_store(move |store| store.delete_artist(&artist_id))
            .await?;
        info!("Deleted artist {}", id);
        Ok(deleted)
    }
}
