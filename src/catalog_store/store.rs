//! SQLite-backed catalog store implementation.
//!
//! Writes go through a single connection; reads are spread round-robin over a
//! small pool of read-only connections. The database runs in WAL mode so
//! readers observe committed writes without blocking them.

use super::models::*;
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CatalogStore;
use crate::sqlite_persistence::{VersionedSchema, BASE_DB_VERSION};
use anyhow::{anyhow, bail, Context, Result};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

pub const DEFAULT_READ_POOL_SIZE: usize = 4;

const ARTIST_COLUMNS: &str =
    "id, name, legal_name, date_of_birth, date_of_death, place_of_birth";
const ALBUM_COLUMNS: &str = "id, title, artist_id, price";
const STOCK_COLUMNS: &str = "id, album_id, num_in_stock, status";

/// SQLite-backed catalog store.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| anyhow!("Catalog connection mutex poisoned"))
}

fn migrate_if_needed(conn: &mut Connection, schemas: &[VersionedSchema]) -> Result<()> {
    let latest_version = schemas.len() - 1;
    let latest_schema = &schemas[latest_version];

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating catalog db schema at version {}", latest_version);
        let tx = conn.transaction()?;
        latest_schema.create(&tx)?;
        tx.commit()?;
        return Ok(());
    }

    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    if db_version < BASE_DB_VERSION as i64 {
        bail!(
            "Database has user_version {} and does not look like a catalog database",
            db_version
        );
    }
    let mut current_version = (db_version - BASE_DB_VERSION as i64) as usize;
    if current_version > latest_version {
        bail!(
            "Catalog db version {} is newer than the latest known version {}",
            current_version,
            latest_version
        );
    }

    if current_version < latest_version {
        let tx = conn.transaction()?;
        for schema in schemas.iter().skip(current_version + 1) {
            if let Some(migration_fn) = schema.migration {
                info!(
                    "Migrating catalog db from version {} to {}",
                    current_version, schema.version
                );
                migration_fn(&tx)?;
            }
            current_version = schema.version;
        }
        tx.pragma_update(None, "user_version", BASE_DB_VERSION + current_version)?;
        tx.commit()?;
    }

    latest_schema
        .validate(conn)
        .context("Catalog db schema validation failed")
}

impl SqliteCatalogStore {
    /// Open (creating if needed) the catalog database at `db_path`.
    ///
    /// `db_path` may be a plain file path or an SQLite `file:` URI.
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open catalog database {:?}", db_path))?;

        write_conn.pragma_update(None, "journal_mode", "WAL")?;
        write_conn.pragma_update(None, "foreign_keys", "ON")?;
        migrate_if_needed(&mut write_conn, CATALOG_VERSIONED_SCHEMAS)?;

        let mut read_pool = Vec::with_capacity(read_pool_size.max(1));
        for _ in 0..read_pool_size.max(1) {
            let read_conn = Connection::open_with_flags(
                db_path,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .context("Failed to open catalog read connection")?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        let store = SqliteCatalogStore {
            read_pool,
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_index: Arc::new(AtomicUsize::new(0)),
        };

        info!(
            "Opened catalog: {} artists, {} genres, {} albums, {} stock rows",
            store.count_artists()?,
            store.count_genres()?,
            store.count_albums()?,
            store.count_album_stocks(None)?
        );

        Ok(store)
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    /// Run `f` inside an immediate transaction on the write connection,
    /// rolling back if it fails.
    fn write_transaction<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = lock(&self.write_conn)?;
        conn.execute("BEGIN IMMEDIATE", [])?;

        match f(&*conn) {
            Ok(value) => {
                conn.execute("COMMIT", [])?;
                Ok(value)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    fn count(&self, sql: &str, params: impl rusqlite::Params) -> Result<usize> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let count: i64 = conn.query_row(sql, params, |r| r.get(0))?;
        Ok(count as usize)
    }

    // =========================================================================
    // Row Parsing
    // =========================================================================

    fn parse_artist_row(row: &rusqlite::Row) -> rusqlite::Result<Artist> {
        Ok(Artist {
            id: row.get(0)?,
            name: row.get(1)?,
            legal_name: row.get(2)?,
            date_of_birth: row.get(3)?,
            date_of_death: row.get(4)?,
            place_of_birth: row.get(5)?,
        })
    }

    /// Parse an album row; genre ids are filled in separately.
    fn parse_album_row(row: &rusqlite::Row) -> rusqlite::Result<Album> {
        Ok(Album {
            id: row.get(0)?,
            title: row.get(1)?,
            artist_id: row.get(2)?,
            price: row.get(3)?,
            genre_ids: Vec::new(),
        })
    }

    fn parse_stock_row(row: &rusqlite::Row, offset: usize) -> rusqlite::Result<AlbumStock> {
        let status: String = row.get(offset + 3)?;
        Ok(AlbumStock {
            id: row.get(offset)?,
            album_id: row.get(offset + 1)?,
            num_in_stock: row.get(offset + 2)?,
            status: StockStatus::from_db_str(&status).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    offset + 3,
                    rusqlite::types::Type::Text,
                    format!("unknown stock status '{}'", status).into(),
                )
            })?,
        })
    }

    fn load_genre_ids(conn: &Connection, album_id: &str) -> Result<Vec<String>> {
        let mut stmt = conn.prepare_cached(
            "SELECT genre_id FROM album_genres WHERE album_id = ?1 ORDER BY position",
        )?;
        let ids = stmt
            .query_map(params![album_id], |r| r.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    fn with_genre_ids(conn: &Connection, mut album: Album) -> Result<Album> {
        album.genre_ids = Self::load_genre_ids(conn, &album.id)?;
        Ok(album)
    }

    fn query_albums(conn: &Connection, sql: &str, param: &str) -> Result<Vec<Album>> {
        let mut stmt = conn.prepare_cached(sql)?;
        let albums = stmt
            .query_map(params![param], Self::parse_album_row)?
            .collect::<Result<Vec<_>, _>>()?;
        albums
            .into_iter()
            .map(|album| Self::with_genre_ids(conn, album))
            .collect()
    }

    fn write_genre_links(conn: &Connection, album: &Album) -> Result<()> {
        let mut position = 0;
        for genre_id in &album.genre_ids {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO album_genres (album_id, genre_id, position) VALUES (?1, ?2, ?3)",
                params![&album.id, genre_id, position],
            )?;
            position += inserted as i64;
        }
        Ok(())
    }

    fn stock_by_album(conn: &Connection, album_id: &str) -> Result<Option<AlbumStock>> {
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM album_stocks WHERE album_id = ?1",
            STOCK_COLUMNS
        ))?;
        Ok(stmt
            .query_row(params![album_id], |row| Self::parse_stock_row(row, 0))
            .optional()?)
    }
}

impl CatalogStore for SqliteCatalogStore {
    // =========================================================================
    // Artists
    // =========================================================================

    fn get_artist(&self, id: &str) -> Result<Option<Artist>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM artists WHERE id = ?1",
            ARTIST_COLUMNS
        ))?;
        Ok(stmt
            .query_row(params![id], Self::parse_artist_row)
            .optional()?)
    }

    fn list_artists(&self) -> Result<Vec<Artist>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM artists ORDER BY name COLLATE NOCASE, id",
            ARTIST_COLUMNS
        ))?;
        let artists = stmt
            .query_map([], Self::parse_artist_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(artists)
    }

    fn insert_artist(&self, artist: &Artist) -> Result<()> {
        let conn = lock(&self.write_conn)?;
        conn.execute(
            "INSERT INTO artists (id, name, legal_name, date_of_birth, date_of_death, place_of_birth)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &artist.id,
                &artist.name,
                &artist.legal_name,
                &artist.date_of_birth,
                &artist.date_of_death,
                &artist.place_of_birth,
            ],
        )
        .with_context(|| format!("Failed to insert artist '{}'", artist.id))?;
        debug!("Inserted artist {}", artist.id);
        Ok(())
    }

    fn update_artist(&self, artist: &Artist) -> Result<bool> {
        let conn = lock(&self.write_conn)?;
        let changed = conn.execute(
            "UPDATE artists SET name = ?1, legal_name = ?2, date_of_birth = ?3,
             date_of_death = ?4, place_of_birth = ?5 WHERE id = ?6",
            params![
                &artist.name,
                &artist.legal_name,
                &artist.date_of_birth,
                &artist.date_of_death,
                &artist.place_of_birth,
                &artist.id,
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete_artist(&self, id: &str) -> Result<bool> {
        let conn = lock(&self.write_conn)?;
        let changed = conn
            .execute("DELETE FROM artists WHERE id = ?1", params![id])
            .with_context(|| format!("Failed to delete artist '{}'", id))?;
        Ok(changed > 0)
    }

    fn count_artists(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM artists", [])
    }

    // =========================================================================
    // Genres
    // =========================================================================

    fn get_genre(&self, id: &str) -> Result<Option<Genre>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let mut stmt = conn.prepare_cached("SELECT id, name FROM genres WHERE id = ?1")?;
        Ok(stmt
            .query_row(params![id], |row| {
                Ok(Genre {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .optional()?)
    }

    fn get_genres(&self, ids: &[String]) -> Result<Vec<Genre>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let mut stmt = conn.prepare_cached("SELECT id, name FROM genres WHERE id = ?1")?;
        let mut genres = Vec::with_capacity(ids.len());
        for id in ids {
            let genre = stmt
                .query_row(params![id], |row| {
                    Ok(Genre {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })
                .optional()?;
            genres.extend(genre);
        }
        Ok(genres)
    }

    fn list_genres(&self) -> Result<Vec<Genre>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let mut stmt =
            conn.prepare_cached("SELECT id, name FROM genres ORDER BY name COLLATE NOCASE, id")?;
        let genres = stmt
            .query_map([], |row| {
                Ok(Genre {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(genres)
    }

    fn insert_genre(&self, genre: &Genre) -> Result<()> {
        let conn = lock(&self.write_conn)?;
        conn.execute(
            "INSERT INTO genres (id, name) VALUES (?1, ?2)",
            params![&genre.id, &genre.name],
        )
        .with_context(|| format!("Failed to insert genre '{}'", genre.id))?;
        Ok(())
    }

    fn update_genre(&self, genre: &Genre) -> Result<bool> {
        let conn = lock(&self.write_conn)?;
        let changed = conn.execute(
            "UPDATE genres SET name = ?1 WHERE id = ?2",
            params![&genre.name, &genre.id],
        )?;
        Ok(changed > 0)
    }

    fn delete_genre(&self, id: &str) -> Result<bool> {
        let conn = lock(&self.write_conn)?;
        let changed = conn
            .execute("DELETE FROM genres WHERE id = ?1", params![id])
            .with_context(|| format!("Failed to delete genre '{}'", id))?;
        Ok(changed > 0)
    }

    fn count_genres(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM genres", [])
    }

    // =========================================================================
    // Albums
    // =========================================================================

    fn get_album(&self, id: &str) -> Result<Option<Album>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM albums WHERE id = ?1",
            ALBUM_COLUMNS
        ))?;
        match stmt.query_row(params![id], Self::parse_album_row).optional()? {
            Some(album) => Ok(Some(Self::with_genre_ids(&conn, album)?)),
            None => Ok(None),
        }
    }

    fn list_albums(&self) -> Result<Vec<AlbumListing>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let mut stmt = conn.prepare_cached(
            "SELECT al.id, al.title, al.artist_id, al.price,
                    ar.id, ar.name, ar.legal_name, ar.date_of_birth, ar.date_of_death, ar.place_of_birth
             FROM albums al
             INNER JOIN artists ar ON ar.id = al.artist_id
             ORDER BY al.title COLLATE NOCASE, al.id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    Self::parse_album_row(row)?,
                    Artist {
                        id: row.get(4)?,
                        name: row.get(5)?,
                        legal_name: row.get(6)?,
                        date_of_birth: row.get(7)?,
                        date_of_death: row.get(8)?,
                        place_of_birth: row.get(9)?,
                    },
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(album, artist)| {
                Ok(AlbumListing {
                    album: Self::with_genre_ids(&conn, album)?,
                    artist,
                })
            })
            .collect()
    }

    fn list_albums_by_artist(&self, artist_id: &str) -> Result<Vec<Album>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        Self::query_albums(
            &conn,
            "SELECT id, title, artist_id, price FROM albums
             WHERE artist_id = ?1 ORDER BY title COLLATE NOCASE, id",
            artist_id,
        )
    }

    fn list_albums_by_genre(&self, genre_id: &str) -> Result<Vec<Album>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        Self::query_albums(
            &conn,
            "SELECT al.id, al.title, al.artist_id, al.price FROM albums al
             INNER JOIN album_genres ag ON ag.album_id = al.id
             WHERE ag.genre_id = ?1 ORDER BY al.title COLLATE NOCASE, al.id",
            genre_id,
        )
    }

    fn insert_album(&self, album: &Album) -> Result<()> {
        self.write_transaction(|conn| {
            conn.execute(
                "INSERT INTO albums (id, title, artist_id, price) VALUES (?1, ?2, ?3, ?4)",
                params![&album.id, &album.title, &album.artist_id, album.price],
            )
            .with_context(|| format!("Failed to insert album '{}'", album.id))?;
            Self::write_genre_links(conn, album)?;
            debug!("Inserted album {}", album.id);
            Ok(())
        })
    }

    fn update_album(&self, album: &Album) -> Result<bool> {
        self.write_transaction(|conn| {
            let changed = conn.execute(
                "UPDATE albums SET title = ?1, artist_id = ?2, price = ?3 WHERE id = ?4",
                params![&album.title, &album.artist_id, album.price, &album.id],
            )?;
            if changed == 0 {
                return Ok(false);
            }
            conn.execute(
                "DELETE FROM album_genres WHERE album_id = ?1",
                params![&album.id],
            )?;
            Self::write_genre_links(conn, album)?;
            Ok(true)
        })
    }

    fn delete_album_cascade(&self, id: &str) -> Result<AlbumDeletion> {
        self.write_transaction(|conn| {
            let in_stock: i64 = conn.query_row(
                "SELECT COUNT(*) FROM album_stocks WHERE album_id = ?1 AND status = ?2",
                params![id, StockStatus::InStock.to_db_str()],
                |row| row.get(0),
            )?;
            if in_stock > 0 {
                return Ok(AlbumDeletion::InStock {
                    count: in_stock as usize,
                });
            }

            let stocks = conn.execute("DELETE FROM album_stocks WHERE album_id = ?1", params![id])?;
            let changed = conn.execute("DELETE FROM albums WHERE id = ?1", params![id])?;
            debug!("Deleted album {} and {} stock rows", id, stocks);
            Ok(if changed > 0 {
                AlbumDeletion::Deleted
            } else {
                AlbumDeletion::NotFound
            })
        })
    }

    fn count_albums(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM albums", [])
    }

    // =========================================================================
    // Album Stocks
    // =========================================================================

    fn get_album_stock(&self, id: &str) -> Result<Option<AlbumStock>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM album_stocks WHERE id = ?1",
            STOCK_COLUMNS
        ))?;
        Ok(stmt
            .query_row(params![id], |row| Self::parse_stock_row(row, 0))
            .optional()?)
    }

    fn find_stock_by_album(&self, album_id: &str) -> Result<Option<AlbumStock>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        Self::stock_by_album(&conn, album_id)
    }

    fn list_stocks_for_album(&self, album_id: &str) -> Result<Vec<AlbumStock>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM album_stocks WHERE album_id = ?1 ORDER BY id",
            STOCK_COLUMNS
        ))?;
        let stocks = stmt
            .query_map(params![album_id], |row| Self::parse_stock_row(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stocks)
    }

    fn list_album_stocks(&self) -> Result<Vec<AlbumStockListing>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let mut stmt = conn.prepare_cached(
            "SELECT al.id, al.title, al.artist_id, al.price,
                    s.id, s.album_id, s.num_in_stock, s.status
             FROM album_stocks s
             INNER JOIN albums al ON al.id = s.album_id
             ORDER BY al.title COLLATE NOCASE, s.id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((Self::parse_album_row(row)?, Self::parse_stock_row(row, 4)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(album, stock)| {
                Ok(AlbumStockListing {
                    stock,
                    album: Self::with_genre_ids(&conn, album)?,
                })
            })
            .collect()
    }

    fn upsert_album_stock(
        &self,
        album_id: &str,
        change: &AlbumStockChange,
    ) -> Result<AlbumStock> {
        self.write_transaction(|conn| {
            conn.execute(
                "INSERT INTO album_stocks (id, album_id, num_in_stock, status)
                 VALUES (?1, ?2, COALESCE(?3, 0), COALESCE(?4, ?5))
                 ON CONFLICT(album_id) DO UPDATE SET
                    num_in_stock = COALESCE(?3, num_in_stock),
                    status = COALESCE(?4, status)",
                params![
                    new_entity_id(),
                    album_id,
                    change.num_in_stock,
                    change.status.map(|s| s.to_db_str()),
                    StockStatus::default().to_db_str(),
                ],
            )
            .with_context(|| format!("Failed to upsert stock for album '{}'", album_id))?;

            Self::stock_by_album(conn, album_id)?
                .ok_or_else(|| anyhow!("Stock row for album '{}' vanished after upsert", album_id))
        })
    }

    fn delete_album_stock(&self, id: &str) -> Result<bool> {
        let conn = lock(&self.write_conn)?;
        let changed = conn.execute("DELETE FROM album_stocks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn delete_stocks_for_album(&self, album_id: &str) -> Result<usize> {
        let conn = lock(&self.write_conn)?;
        let changed = conn.execute(
            "DELETE FROM album_stocks WHERE album_id = ?1",
            params![album_id],
        )?;
        Ok(changed)
    }

    fn count_album_stocks(&self, status: Option<StockStatus>) -> Result<usize> {
        match status {
            Some(status) => self.count(
                "SELECT COUNT(*) FROM album_stocks WHERE status = ?1",
                params![status.to_db_str()],
            ),
            None => self.count("SELECT COUNT(*) FROM album_stocks", []),
        }
    }
}
