//! ID aliases for Chorus entities
//!
//! All entities use SQLite rowid-style integer primary keys.

/// User identifier
pub type UserId = i64;

/// Song identifier
pub type SongId = i64;

/// Playlist identifier
pub type PlaylistId = i64;
