use super::error::CatalogResult;
use super::service::CatalogService;
use crate::catalog_store::StockStatus;
use serde::Serialize;

/// Counts shown on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeSummary {
    pub title: &'static str,
    pub album_count: usize,
    pub album_stock_count: usize,
    pub album_stock_available_count: usize,
    pub artist_count: usize,
    pub genre_count: usize,
}

impl CatalogService {
    /// Issue every count at once and wait for all of them.
    pub async fn home_summary(&self) -> CatalogResult<HomeSummary> {
        let (albums, stocks, available, artists, genres) = tokio::try_join!(
            self.with_store(|store| store.count_albums()),
            self.with_store(|store| store.count_album_stocks(None)),
            self.with_store(|store| store.count_album_stocks(Some(StockStatus::InStock))),
            self.with_store(|store| store.count_artists()),
            self.with_store(|store| store.count_genres()),
        )?;

        Ok(HomeSummary {
            title: "Local Record Store Home",
            album_count: albums,
            album_stock_count: stocks,
            album_stock_available_count: available,
            artist_count: artists,
            genre_count: genres,
        })
    }
}
