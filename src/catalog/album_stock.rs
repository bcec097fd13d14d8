//! Album stock pages.
//!
//! Stock rows have no separate create path: both the create and the update
//! submissions upsert the single row kept per album.

use super::error::{CatalogError, CatalogResult};
use super::service::{CatalogService, DeleteOutcome, FormOutcome};
use super::validation::{
    validate, FieldError, FieldKind, FieldSpec, FormData, SanitizedForm, Validated,
};
use super::views::{Link, StockView};
use crate::catalog_store::*;
use serde::Serialize;
use tracing::info;

pub const ALBUM_STOCK_LIST_URL: &str = "/catalog/albumstocks";

const ALBUM_STOCK_FORM: &[FieldSpec] = &[
    FieldSpec::new("album", "Album", FieldKind::Optional, ""),
    FieldSpec::new(
        "num_in_stock",
        "Number in stock",
        FieldKind::Integer,
        "Number in stock must be a non-negative integer.",
    ),
    FieldSpec::new("status", "Status", FieldKind::Enumerated, ""),
];

#[derive(Debug, Serialize)]
pub struct AlbumStockListView {
    pub title: &'static str,
    pub stocks: Vec<StockView>,
}

#[derive(Debug, Serialize)]
pub struct AlbumStockDetailView {
    pub title: String,
    pub stock: StockView,
}

#[derive(Debug, Serialize)]
pub struct AlbumStockFormView {
    pub title: &'static str,
    pub stock: SanitizedForm,
    pub albums: Vec<Link>,
    pub statuses: [StockStatus; 3],
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct AlbumStockDeleteView {
    pub title: &'static str,
    pub stock: StockView,
}

fn form_title(id: Option<&str>) -> &'static str {
    if id.is_some() {
        "Update Album Stock"
    } else {
        "Create Album Stock"
    }
}

impl CatalogService {
    pub async fn list_album_stocks(&self) -> CatalogResult<AlbumStockListView> {
        let listings = self.with_store(|store| store.list_album_stocks()).await?;
        Ok(AlbumStockListView {
            title: "Album Stock List",
            stocks: listings
                .iter()
                .map(|listing| StockView::new(&listing.stock, Some(&listing.album)))
                .collect(),
        })
    }

    /// Load a stock row and the album it belongs to.
    async fn load_stock_view(&self, id: &str) -> CatalogResult<(AlbumStock, StockView)> {
        let stock_id = id.to_string();
        let stock = self
            .with_store(move |store| store.get_album_stock(&stock_id))
            .await?
            .ok_or_else(|| CatalogError::not_found("AlbumStock", id))?;
        let album_id = stock.album_id.clone();
        let album = self
            .with_store(move |store| store.get_album(&album_id))
            .await?;
        let view = StockView::new(&stock, album.as_ref());
        Ok((stock, view))
    }

    pub async fn album_stock_detail(&self, id: &str) -> CatalogResult<AlbumStockDetailView> {
        let (_, stock) = self.load_stock_view(id).await?;
        Ok(AlbumStockDetailView {
            title: stock
                .album
                .as_ref()
                .map(|album| format!("Stock: {}", album.name))
                .unwrap_or_else(|| "Stock".to_string()),
            stock,
        })
    }

    async fn album_stock_form_view(
        &self,
        title: &'static str,
        values: SanitizedForm,
        errors: Vec<FieldError>,
    ) -> CatalogResult<AlbumStockFormView> {
        let albums = self.with_store(|store| store.list_albums()).await?;
        Ok(AlbumStockFormView {
            title,
            stock: values,
            albums: albums
                .iter()
                .map(|listing| Link::album(&listing.album))
                .collect(),
            statuses: StockStatus::ALL,
            errors,
        })
    }

    pub async fn album_stock_create_form(&self) -> CatalogResult<AlbumStockFormView> {
        let values = SanitizedForm::default()
            .with("status", StockStatus::default().to_db_str());
        self.album_stock_form_view(form_title(None), values, Vec::new())
            .await
    }

    pub async fn album_stock_update_form(&self, id: &str) -> CatalogResult<AlbumStockFormView> {
        let stock_id = id.to_string();
        let stock = self
            .with_store(move |store| store.get_album_stock(&stock_id))
            .await?
            .ok_or_else(|| CatalogError::not_found("AlbumStock", id))?;
        let values = SanitizedForm::default()
            .with("album", stock.album_id)
            .with("num_in_stock", stock.num_in_stock.to_string())
            .with("status", stock.status.to_db_str());
        self.album_stock_form_view(form_title(Some(id)), values, Vec::new())
            .await
    }

    /// Resolve the album a submission targets and check that it exists.
    async fn resolve_stock_album(
        &self,
        validated: &mut Validated,
        existing: Option<&AlbumStock>,
    ) -> CatalogResult<Option<String>> {
        let album_id = validated
            .values
            .get("album")
            .map(str::to_string)
            .or_else(|| existing.map(|stock| stock.album_id.clone()));

        let Some(album_id) = album_id else {
            validated.push_error("album", "Album must not be empty.");
            return Ok(None);
        };

        let lookup_id = album_id.clone();
        let album = self
            .with_store(move |store| store.get_album(&lookup_id))
            .await?;
        if album.is_none() {
            validated.push_error("album", "Album not found.");
            return Ok(None);
        }
        Ok(Some(album_id))
    }

    /// Create or update the stock row of the submitted album.
    ///
    /// `id` is the stock row named in the URL, if any. When the submission
    /// leaves the album out, that row's album is used. Missing counts and
    /// statuses keep the stored values, or take the defaults on insert.
    pub async fn upsert_album_stock(
        &self,
        id: Option<&str>,
        form: FormData,
    ) -> CatalogResult<FormOutcome<AlbumStockFormView>> {
        let existing = match id {
            Some(id) => {
                let stock_id = id.to_string();
                self.with_store(move |store| store.get_album_stock(&stock_id))
                    .await?
            }
            None => None,
        };
        if let (Some(id), None) = (id, &existing) {
            if !form.value("album").is_some_and(|album| !album.trim().is_empty()) {
                return Err(CatalogError::not_found("AlbumStock", id));
            }
        }

        let mut validated = validate(ALBUM_STOCK_FORM, &form);
        let album_id = self
            .resolve_stock_album(&mut validated, existing.as_ref())
            .await?;

        let status = match validated.values.get("status") {
            None => None,
            Some(value) => {
                let status = StockStatus::from_form_str(value);
                if status.is_none() {
                    validated.push_error(
                        "status",
                        "Status must be one of In Stock, Out of Stock, Backorder.",
                    );
                }
                status
            }
        };

        let Some(album_id) = album_id.filter(|_| validated.is_valid()) else {
            let view = self
                .album_stock_form_view(form_title(id), validated.values, validated.errors)
                .await?;
            return Ok(FormOutcome::Invalid(view));
        };

        let change = AlbumStockChange {
            num_in_stock: validated.values.integer("num_in_stock"),
            status,
        };
        let stock = self
            .with_store(move |store| store.upsert_album_stock(&album_id, &change))
            .await?;

        info!(
            "Stored stock {} for album {}: {} {}",
            stock.id, stock.album_id, stock.num_in_stock, stock.status
        );
        Ok(FormOutcome::Saved { url: stock.url() })
    }

    pub async fn album_stock_delete_form(&self, id: &str) -> CatalogResult<AlbumStockDeleteView> {
        let (_, stock) = self.load_stock_view(id).await?;
        Ok(AlbumStockDeleteView {
            title: "Delete Album Stock",
            stock,
        })
    }

    /// Stock rows have no dependents, so deletion is never blocked.
    pub async fn delete_album_stock(
        &self,
        id: &str,
    ) -> CatalogResult<DeleteOutcome<AlbumStockDeleteView>> {
        let stock_id = id.to_string();
        if self
            .with_store(move |store| store.delete_album_stock(&stock_id))
            .await?
        {
            info!("Deleted album stock {}", id);
        }
        Ok(DeleteOutcome::Deleted {
            url: ALBUM_STOCK_LIST_URL.to_string(),
        })
    }
}
