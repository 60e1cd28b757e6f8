//! Playlists vertical slice
//!
//! Every operation here is ownership-scoped: a playlist owned by someone
//! else is treated as not found, hiding its existence. There is no
//! admin-scoped playlist route.

use crate::songs::song_from_row;
use chorus_core::access;
use chorus_core::error::{ChorusError, Result};
use chorus_core::types::{Caller, Playlist, PlaylistId, Song, SongId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn playlist_from_row(row: &SqliteRow) -> Playlist {
    Playlist {
        id: row.get("id"),
        name: row.get("name"),
        owner_id: row.get("owner_id"),
        created_at: row.get("created_at"),
        songs: None,
    }
}

/// The caller's own playlists, newest first
pub async fn list_for(pool: &SqlitePool, caller: &Caller) -> Result<Vec<Playlist>> {
    let identity = access::ensure_authenticated(caller)?;

    let rows = sqlx::query(
        "SELECT id, name, owner_id, created_at FROM playlists
         WHERE owner_id = ?
         ORDER BY created_at DESC, id DESC",
    )
    .bind(identity.id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(playlist_from_row).collect())
}

/// Create a playlist owned by the caller
pub async fn create(pool: &SqlitePool, caller: &Caller, name: &str) -> Result<Playlist> {
    let identity = access::ensure_authenticated(caller)?;

    let name = name.trim();
    if name.is_empty() {
        return Err(ChorusError::invalid_input("playlist name must not be empty"));
    }

    let result = sqlx::query("INSERT INTO playlists (name, owner_id) VALUES (?, ?)")
        .bind(name)
        .bind(identity.id)
        .execute(pool)
        .await?;

    let id = result.last_insert_rowid();

    let row = sqlx::query("SELECT id, name, owner_id, created_at FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ChorusError::storage("failed to retrieve created playlist"))?;

    Ok(playlist_from_row(&row))
}

/// Ownership-scoped lookup
///
/// "Exists but owned by someone else" and "does not exist" are the same
/// `NotFound` here, so a caller cannot enumerate other users' playlists.
async fn owned_by_caller(pool: &SqlitePool, caller: &Caller, id: PlaylistId) -> Result<Playlist> {
    access::ensure_authenticated(caller)?;

    let row = sqlx::query("SELECT id, name, owner_id, created_at FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row.map(|r| playlist_from_row(&r)) {
        Some(playlist) if access::can_mutate_playlist(caller, &playlist) => Ok(playlist),
        _ => Err(ChorusError::not_found("Playlist", id)),
    }
}

/// Get the caller's playlist with its member songs in insertion order
pub async fn get_with_songs(pool: &SqlitePool, caller: &Caller, id: PlaylistId) -> Result<Playlist> {
    let mut playlist = owned_by_caller(pool, caller, id).await?;

    let rows = sqlx::query(
        "SELECT s.id, s.title, s.artist, s.composer, s.genre, s.release_date, s.lyrics,
                s.source_ref, s.is_public, s.owner_id, s.created_at
         FROM playlist_songs ps
         INNER JOIN songs s ON ps.song_id = s.id
         WHERE ps.playlist_id = ?
         ORDER BY ps.added_at, s.id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    playlist.songs = Some(rows.iter().map(song_from_row).collect());

    Ok(playlist)
}

/// Rename the caller's playlist
pub async fn rename(
    pool: &SqlitePool,
    caller: &Caller,
    id: PlaylistId,
    new_name: &str,
) -> Result<Playlist> {
    let mut playlist = owned_by_caller(pool, caller, id).await?;

    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(ChorusError::invalid_input("playlist name must not be empty"));
    }

    sqlx::query("UPDATE playlists SET name = ? WHERE id = ?")
        .bind(new_name)
        .bind(id)
        .execute(pool)
        .await?;

    playlist.name = new_name.to_string();
    Ok(playlist)
}

/// Delete the caller's playlist, cascading membership rows
pub async fn delete(pool: &SqlitePool, caller: &Caller, id: PlaylistId) -> Result<()> {
    owned_by_caller(pool, caller, id).await?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// Add a song to the caller's playlist
///
/// A duplicate pair is a distinct error carrying both names so the client
/// can say exactly what happened; the membership primary key catches the
/// race two concurrent adds would otherwise win together.
pub async fn add_song(
    pool: &SqlitePool,
    caller: &Caller,
    playlist_id: PlaylistId,
    song_id: SongId,
) -> Result<Song> {
    let playlist = owned_by_caller(pool, caller, playlist_id).await?;

    // The read gate applies here too: a private song the caller cannot see
    // cannot be pulled into a playlist to read it through the back door.
    let song = crate::songs::get_visible(pool, caller, song_id).await?;

    let duplicate = membership_exists(pool, playlist_id, song_id).await?;
    if duplicate {
        return Err(ChorusError::DuplicateMembership {
            song_title: song.title,
            playlist_name: playlist.name,
        });
    }

    sqlx::query("INSERT INTO playlist_songs (playlist_id, song_id) VALUES (?, ?)")
        .bind(playlist_id)
        .bind(song_id)
        .execute(pool)
        .await
        .map_err(|e| match e.as_database_error() {
            // Lost the check-then-insert race; same outcome as the check.
            Some(db) if db.is_unique_violation() => ChorusError::DuplicateMembership {
                song_title: song.title.clone(),
                playlist_name: playlist.name.clone(),
            },
            _ => ChorusError::from(e),
        })?;

    Ok(song)
}

/// Remove a song from the caller's playlist
///
/// Idempotent: removing a membership that is not there still leaves the
/// playlist in the desired state, so it succeeds.
pub async fn remove_song(
    pool: &SqlitePool,
    caller: &Caller,
    playlist_id: PlaylistId,
    song_id: SongId,
) -> Result<()> {
    owned_by_caller(pool, caller, playlist_id).await?;

    let song_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM songs WHERE id = ?")
        .bind(song_id)
        .fetch_optional(pool)
        .await?;
    if song_exists.is_none() {
        return Err(ChorusError::not_found("Song", song_id));
    }

    sqlx::query("DELETE FROM playlist_songs WHERE playlist_id = ? AND song_id = ?")
        .bind(playlist_id)
        .bind(song_id)
        .execute(pool)
        .await?;

    Ok(())
}

async fn membership_exists(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    song_id: SongId,
) -> Result<bool> {
    let row: Option<i64> = sqlx::query_scalar(
        "SELECT 1 FROM playlist_songs WHERE playlist_id = ? AND song_id = ?",
    )
    .bind(playlist_id)
    .bind(song_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}
