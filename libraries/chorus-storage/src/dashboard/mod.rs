//! Admin dashboard aggregation
//!
//! Read-only reporting over the identity and content stores. The admin gate
//! is checked once up front; the report is produced as a unit or not at
//! all.

use crate::songs::song_from_row;
use chorus_core::access;
use chorus_core::error::Result;
use chorus_core::types::{Caller, DashboardReport, GenreCount, Overview, UserSongCount};
use sqlx::{Row, SqlitePool};

/// How many recent songs the dashboard shows
pub const RECENT_SONGS_LIMIT: i64 = 5;

/// Build the full dashboard report for an admin caller
pub async fn report(pool: &SqlitePool, caller: &Caller) -> Result<DashboardReport> {
    access::ensure_admin(caller)?;

    let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    let admin_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_admin = 1")
        .fetch_one(pool)
        .await?;
    let total_songs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(pool)
        .await?;
    let public_songs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs WHERE is_public = 1")
        .fetch_one(pool)
        .await?;
    let total_playlists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM playlists")
        .fetch_one(pool)
        .await?;

    let overview = Overview {
        total_users,
        total_songs,
        total_playlists,
        public_songs,
        private_songs: total_songs - public_songs,
        admin_users,
    };

    let genre_stats = sqlx::query(
        "SELECT genre, COUNT(*) AS count FROM songs
         WHERE genre IS NOT NULL
         GROUP BY genre
         ORDER BY count DESC, genre",
    )
    .fetch_all(pool)
    .await?
    .iter()
    .map(|row| GenreCount {
        genre: row.get("genre"),
        count: row.get("count"),
    })
    .collect();

    let user_stats = sqlx::query(
        "SELECT u.username AS username, COUNT(s.id) AS count
         FROM users u
         INNER JOIN songs s ON s.owner_id = u.id
         GROUP BY u.id
         ORDER BY count DESC, username",
    )
    .fetch_all(pool)
    .await?
    .iter()
    .map(|row| UserSongCount {
        username: row.get("username"),
        count: row.get("count"),
    })
    .collect();

    let recent_songs = sqlx::query(
        "SELECT s.id, s.title, s.artist, s.composer, s.genre, s.release_date, s.lyrics,
                s.source_ref, s.is_public, s.owner_id, s.created_at,
                u.username AS owner_username
         FROM songs s
         INNER JOIN users u ON s.owner_id = u.id
         ORDER BY s.created_at DESC, s.id DESC
         LIMIT ?",
    )
    .bind(RECENT_SONGS_LIMIT)
    .fetch_all(pool)
    .await?
    .iter()
    .map(song_from_row)
    .collect();

    Ok(DashboardReport {
        overview,
        genre_stats,
        user_stats,
        recent_songs,
    })
}
