use super::error::{CatalogError, CatalogResult};
use super::guard::check_genre_deletion;
use super::service::{CatalogService, DeleteOutcome, FormOutcome};
use super::validation::{
    unescape, validate, Check, FieldError, FieldKind, FieldSpec, FormData, SanitizedForm,
};
use super::views::Link;
use crate::catalog_store::*;
use serde::Serialize;
use tracing::info;

pub const GENRE_LIST_URL: &str = "/catalog/genres";

const GENRE_FORM: &[FieldSpec] = &[FieldSpec::new(
    "name",
    "Genre name",
    FieldKind::Required,
    "Genre name must not be empty.",
)
.with_checks(&[Check::MaxLength(100)])];

#[derive(Debug, Serialize)]
pub struct GenreListView {
    pub title: &'static str,
    pub genres: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub struct GenreDetailView {
    pub title: String,
    pub genre: Link,
    pub albums: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub struct GenreFormView {
    pub title: &'static str,
    pub genre: SanitizedForm,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct GenreDeleteView {
    pub title: &'static str,
    pub genre: Link,
    pub albums: Vec<Link>,
    pub conflict: Option<String>,
}

fn form_title(id: Option<&str>) -> &'static str {
    if id.is_some() {
        "Update Genre"
    } else {
        "Create Genre"
    }
}

impl CatalogService {
    pub async fn list_genres(&self) -> CatalogResult<GenreListView> {
        let genres = self.with_store(|store| store.list_genres()).await?;
        Ok(GenreListView {
            title: "Genre List",
            genres: genres.iter().map(Link::genre).collect(),
        })
    }

    async fn load_genre_with_albums(
        &self,
        id: &str,
    ) -> CatalogResult<(Option<Genre>, Vec<Album>)> {
        let (genre_id, albums_genre_id) = (id.to_string(), id.to_string());
        tokio::try_join!(
            self.with_store(move |store| store.get_genre(&genre_id)),
            self.with_store(move |store| store.list_albums_by_genre(&albums_genre_id)),
        )
    }

    pub async fn genre_detail(&self, id: &str) -> CatalogResult<GenreDetailView> {
        let (genre, albums) = self.load_genre_with_albums(id).await?;
        let genre = genre.ok_or_else(|| CatalogError::not_found("Genre", id))?;
        Ok(GenreDetailView {
            title: genre.name.clone(),
            genre: Link::genre(&genre),
            albums: albums.iter().map(Link::album).collect(),
        })
    }

    pub async fn genre_create_form(&self) -> CatalogResult<GenreFormView> {
        Ok(GenreFormView {
            title: form_title(None),
            genre: SanitizedForm::default(),
            errors: Vec::new(),
        })
    }

    pub async fn genre_update_form(&self, id: &str) -> CatalogResult<GenreFormView> {
        let genre_id = id.to_string();
        let genre = self
            .with_store(move |store| store.get_genre(&genre_id))
            .await?
            .ok_or_else(|| CatalogError::not_found("Genre", id))?;
        Ok(GenreFormView {
            title: form_title(Some(id)),
            genre: SanitizedForm::default().with("name", unescape(&genre.name)),
            errors: Vec::new(),
        })
    }

    async fn save_genre(
        &self,
        id: Option<&str>,
        form: FormData,
    ) -> CatalogResult<FormOutcome<GenreFormView>> {
        let validated = validate(GENRE_FORM, &form);
        if !validated.is_valid() {
            return Ok(FormOutcome::Invalid(GenreFormView {
                title: form_title(id),
                genre: validated.values,
                errors: validated.errors,
            }));
        }

        let genre = Genre {
            id: id.map(str::to_string).unwrap_or_else(new_entity_id),
            name: validated.values.get("name").unwrap_or_default().to_string(),
        };
        let url = genre.url();
        let genre_id = genre.id.clone();

        let is_update = id.is_some();
        let saved = self
            .with_store(move |store| {
                if is_update {
                    store.update_genre(&genre)
                } else {
                    store.insert_genre(&genre).map(|_| true)
                }
            })
            .await?;
        if !saved {
            return Err(CatalogError::not_found("Genre", genre_id));
        }

        info!(
            "{} genre {}",
            if is_update { "Updated" } else { "Created" },
            genre_id
        );
        Ok(FormOutcome::Saved { url })
    }

    pub async fn create_genre(&self, form: FormData) -> CatalogResult<FormOutcome<GenreFormView>> {
        self.save_genre(None, form).await
    }

    pub async fn update_genre(
        &self,
        id: &str,
        form: FormData,
    ) -> CatalogResult<FormOutcome<GenreFormView>> {
        let genre_id = id.to_string();
        if self
            .with_store(move |store| store.get_genre(&genre_id))
            .await?
            .is_none()
        {
            return Err(CatalogError::not_found("Genre", id));
        }
        self.save_genre(Some(id), form).await
    }

    pub async fn genre_delete_form(&self, id: &str) -> CatalogResult<GenreDeleteView> {
        let (genre, albums) = self.load_genre_with_albums(id).await?;
        let genre = genre.ok_or_else(|| CatalogError::not_found("Genre", id))?;
        Ok(GenreDeleteView {
            title: "Delete Genre",
            genre: Link::genre(&genre),
            albums: albums.iter().map(Link::album).collect(),
            conflict: None,
        })
    }

    /// Delete a genre that no album is tagged with.
    pub async fn delete_genre(&self, id: &str) -> CatalogResult<DeleteOutcome<GenreDeleteView>> {
        let deleted = DeleteOutcome::Deleted {
            url: GENRE_LIST_URL.to_string(),
        };

        let (genre, albums) = self.load_genre_with_albums(id).await?;
        let Some(genre) = genre else {
            return Ok(deleted);
        };

        if let Err(conflict) = check_genre_deletion(&albums) {
            info!("Refusing to delete genre {}: {}", id, conflict);
            return Ok(DeleteOutcome::Blocked(GenreDeleteView {
                title: "Delete Genre",
                genre: Link::genre(&genre),
                albums: albums.iter().map(Link::album).collect(),
                conflict: Some(conflict.to_string()),
            }));
        }

        let genre_id = id.to_string();
        self.with_store(move |store| store.delete_genre(&genre_id))
            .await?;
        info!("Deleted genre {}", id);
        Ok(deleted)
    }
}
