//! SQLite schema definitions for the record store catalog.
//!
//! One table per entity, plus a junction table for album genres. Entity ids
//! are opaque text keys; references are foreign keys to those ids.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

// =============================================================================
// Foreign Keys
// =============================================================================

const ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const GENRE_FK: ForeignKey = ForeignKey {
    foreign_table: "genres",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

/// Genre links go away with their album.
const ALBUM_LINK_FK: ForeignKey = ForeignKey {
    foreign_table: "albums",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

/// Stock rows must be removed explicitly before their album.
const ALBUM_STOCK_FK: ForeignKey = ForeignKey {
    foreign_table: "albums",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

// =============================================================================
// Tables
// =============================================================================

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("legal_name", &SqlType::Text),
        sqlite_column!("date_of_birth", &SqlType::Text), // 'YYYY-MM-DD'
        sqlite_column!("date_of_death", &SqlType::Text),
        sqlite_column!("place_of_birth", &SqlType::Text),
    ],
    indices: &[("idx_artists_name", "name")],
    unique_constraints: &[],
};

const GENRES_TABLE: Table = Table {
    name: "genres",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_genres_name", "name")],
    unique_constraints: &[],
};

const ALBUMS_TABLE: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!(
            "artist_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ARTIST_FK)
        ),
        sqlite_column!("price", &SqlType::Real, non_null = true),
    ],
    indices: &[
        ("idx_albums_artist", "artist_id"),
        ("idx_albums_title", "title"),
    ],
    unique_constraints: &[],
};

const ALBUM_GENRES_TABLE: Table = Table {
    name: "album_genres",
    columns: &[
        sqlite_column!(
            "album_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ALBUM_LINK_FK)
        ),
        sqlite_column!(
            "genre_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&GENRE_FK)
        ),
        sqlite_column!("position", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_album_genres_genre", "genre_id")],
    unique_constraints: &[&["album_id", "genre_id"]],
};

const ALBUM_STOCKS_TABLE: Table = Table {
    name: "album_stocks",
    columns: &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!(
            "album_id",
            &SqlType::Text,
            non_null = true,
            foreign_key = Some(&ALBUM_STOCK_FK)
        ),
        sqlite_column!(
            "num_in_stock",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0"),
            check = Some("num_in_stock >= 0")
        ),
        sqlite_column!(
            "status",
            &SqlType::Text,
            non_null = true,
            default_value = Some("'Out of Stock'"),
            check = Some("status IN ('In Stock', 'Out of Stock', 'Backorder')")
        ),
    ],
    indices: &[("idx_album_stocks_status", "status")],
    // One inventory row per album
    unique_constraints: &[&["album_id"]],
};

// =============================================================================
// Versioned Schema Definition
// =============================================================================

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        ARTISTS_TABLE,
        GENRES_TABLE,
        ALBUMS_TABLE,
        ALBUM_GENRES_TABLE,
        ALBUM_STOCKS_TABLE,
    ],
    migration: None,
}];
