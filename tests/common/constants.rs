//! Shared constants for end-to-end tests
//!
//! When the fixture catalog changes, update only this file.

// ============================================================================
// Test Catalog IDs
// ============================================================================

/// Genre ID for "Rock"
pub const GENRE_ROCK_ID: &str = "genre-rock";
pub const GENRE_ROCK_NAME: &str = "Rock";

/// Genre ID for "Pop"
pub const GENRE_POP_ID: &str = "genre-pop";
pub const GENRE_POP_NAME: &str = "Pop";

/// Genre ID for "Jazz", used by no album
pub const GENRE_UNUSED_ID: &str = "genre-jazz";
pub const GENRE_UNUSED_NAME: &str = "Jazz";

/// Artist ID for "Prince"
pub const ARTIST_1_ID: &str = "artist-1";
pub const ARTIST_1_NAME: &str = "Prince";

/// Artist ID for "Aretha Franklin"
pub const ARTIST_2_ID: &str = "artist-2";
pub const ARTIST_2_NAME: &str = "Aretha Franklin";

/// Artist ID for "Nobody Yet", who has no albums
pub const ARTIST_3_ID: &str = "artist-3";
pub const ARTIST_3_NAME: &str = "Nobody Yet";

/// Album ID for "1999" by Prince, 31 In Stock
pub const ALBUM_1_ID: &str = "album-1";
pub const ALBUM_1_TITLE: &str = "1999";
pub const ALBUM_1_IN_STOCK: i64 = 31;

/// Album ID for "Aretha Now" by Aretha Franklin, on Backorder
pub const ALBUM_2_ID: &str = "album-2";
pub const ALBUM_2_TITLE: &str = "Aretha Now";

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for the server to answer its first request
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Per-request timeout of the test client
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Delay between readiness probes
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
