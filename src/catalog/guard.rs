//! Deletion guards.
//!
//! An entity may not be deleted while dependents in a disallowed state still
//! reference it. The guards only inspect already loaded dependents and never
//! touch the store.

use crate::catalog_store::{Album, AlbumStock, StockStatus};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelationshipConflict {
    #[error("This album still has {count} stock record(s) marked In Stock. Update them before deleting the album.")]
    AlbumInStock { count: usize },

    #[error("This artist still has {count} album(s). Delete them before deleting the artist.")]
    ArtistHasAlbums { count: usize },

    #[error("This genre is still used by {count} album(s). Remove it from them before deleting the genre.")]
    GenreHasAlbums { count: usize },
}

/// An album can go only when none of its stock rows is In Stock.
pub fn check_album_deletion(stocks: &[AlbumStock]) -> Result<(), RelationshipConflict> {
    let count = stocks
        .iter()
        .filter(|stock| stock.status == StockStatus::InStock)
        .count();
    if count > 0 {
        return Err(RelationshipConflict::AlbumInStock { count });
    }
    Ok(())
}

pub fn check_artist_deletion(albums: &[Album]) -> Result<(), RelationshipConflict> {
    if !albums.is_empty() {
        return Err(RelationshipConflict::ArtistHasAlbums {
            count: albums.len(),
        });
    }
    Ok(())
}

pub fn check_genre_deletion(albums: &[Album]) -> Result<(), RelationshipConflict> {
    if !albums.is_empty() {
        return Err(RelationshipConflict::GenreHasAlbums {
            count: albums.len(),
        });
    }
    Ok(())
}
