//! CatalogStore trait definition.
//!
//! The trait is the store contract the catalog service is written against:
//! find, list, count, insert, update, upsert and delete primitives over the
//! four entity types. Reference fields are returned as ids; the `list_*`
//! methods that return listings expand them with a join.

use super::models::*;
use anyhow::Result;

/// Trait for catalog storage backends.
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Artists
    // =========================================================================

    fn get_artist(&self, id: &str) -> Result<Option<Artist>>;

    /// All artists sorted by name.
    fn list_artists(&self) -> Result<Vec<Artist>>;

    fn insert_artist(&self, artist: &Artist) -> Result<()>;

    /// Returns false when no artist has the given id.
    fn update_artist(&self, artist: &Artist) -> Result<bool>;

    /// Returns false when no artist has the given id.
    fn delete_artist(&self, id: &str) -> Result<bool>;

    fn count_artists(&self) -> Result<usize>;

    // =========================================================================
    // Genres
    // =========================================================================

    fn get_genre(&self, id: &str) -> Result<Option<Genre>>;

    /// Fetch several genres at once, in the order of `ids`. Unknown ids are
    /// skipped.
    fn get_genres(&self, ids: &[String]) -> Result<Vec<Genre>>;

    /// All genres sorted by name.
    fn list_genres(&self) -> Result<Vec<Genre>>;

    fn insert_genre(&self, genre: &Genre) -> Result<()>;

    fn update_genre(&self, genre: &Genre) -> Result<bool>;

    fn delete_genre(&self, id: &str) -> Result<bool>;

    fn count_genres(&self) -> Result<usize>;

    // =========================================================================
    // Albums
    // =========================================================================

    fn get_album(&self, id: &str) -> Result<Option<Album>>;

    /// All albums sorted by title, each with its artist.
    fn list_albums(&self) -> Result<Vec<AlbumListing>>;

    /// Albums whose artist reference is `artist_id`, sorted by title.
    fn list_albums_by_artist(&self, artist_id: &str) -> Result<Vec<Album>>;

    /// Albums tagged with `genre_id`, sorted by title.
    fn list_albums_by_genre(&self, genre_id: &str) -> Result<Vec<Album>>;

    /// Insert an album together with its genre links.
    fn insert_album(&self, album: &Album) -> Result<()>;

    /// Update an album, replacing its genre links.
    fn update_album(&self, album: &Album) -> Result<bool>;

    /// Delete an album and every stock row referencing it in one transaction,
    /// unless one of those rows is In Stock.
    fn delete_album_cascade(&self, id: &str) -> Result<AlbumDeletion>;

    fn count_albums(&self) -> Result<usize>;

    // =========================================================================
    // Album Stocks
    // =========================================================================

    fn get_album_stock(&self, id: &str) -> Result<Option<AlbumStock>>;

    fn find_stock_by_album(&self, album_id: &str) -> Result<Option<AlbumStock>>;

    fn list_stocks_for_album(&self, album_id: &str) -> Result<Vec<AlbumStock>>;

    /// All stock rows with their album, sorted by album title.
    fn list_album_stocks(&self) -> Result<Vec<AlbumStockListing>>;

    /// Update the stock row of `album_id` in place, or insert one if none
    /// exists. Returns the stored row.
    fn upsert_album_stock(&self, album_id: &str, change: &AlbumStockChange)
        -> Result<AlbumStock>;

    fn delete_album_stock(&self, id: &str) -> Result<bool>;

    /// Delete every stock row of `album_id`, returning how many were removed.
    fn delete_stocks_for_album(&self, album_id: &str) -> Result<usize>;

    /// Count stock rows, optionally only those with the given status.
    fn count_album_stocks(&self, status: Option<StockStatus>) -> Result<usize>;
}
