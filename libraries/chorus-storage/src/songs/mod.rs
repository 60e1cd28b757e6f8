//! Songs vertical slice
//!
//! Listing applies the caller's visibility in SQL (the same rule as
//! `chorus_core::access::can_read_song`); mutations resolve the target
//! through the route-appropriate scope before touching anything.

use chorus_core::access;
use chorus_core::error::{ChorusError, Result};
use chorus_core::types::{parse_public_flag, Caller, CreateSong, Song, SongId, UpdateSong};
use chorus_core::MutationRoute;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SONG_COLUMNS: &str = "s.id, s.title, s.artist, s.composer, s.genre, s.release_date, \
                            s.lyrics, s.source_ref, s.is_public, s.owner_id, s.created_at";

pub(crate) fn song_from_row(row: &SqliteRow) -> Song {
    Song {
        id: row.get("id"),
        title: row.get("title"),
        artist: row.get("artist"),
        composer: row.get("composer"),
        genre: row.get("genre"),
        release_date: row.get("release_date"),
        lyrics: row.get("lyrics"),
        source_ref: row.get("source_ref"),
        is_public: row.get::<i64, _>("is_public") != 0,
        owner_id: row.get("owner_id"),
        created_at: row.get("created_at"),
        owner_username: row.try_get("owner_username").unwrap_or(None),
    }
}

/// Get song by ID, no visibility or ownership scoping
async fn fetch_by_id(pool: &SqlitePool, id: SongId) -> Result<Option<Song>> {
    let row = sqlx::query(&format!("SELECT {SONG_COLUMNS} FROM songs s WHERE s.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| song_from_row(&r)))
}

/// All songs annotated with owner username, newest first
///
/// Ungated; the admin boundary gates it, and [`visible`] uses it for admin
/// callers.
pub async fn all_with_owner(pool: &SqlitePool) -> Result<Vec<Song>> {
    let rows = sqlx::query(&format!(
        "SELECT {SONG_COLUMNS}, u.username AS owner_username
         FROM songs s
         INNER JOIN users u ON s.owner_id = u.id
         ORDER BY s.created_at DESC, s.id DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(song_from_row).collect())
}

/// All songs owned by one user
///
/// Ungated; used by account deletion to find the media files that go with
/// the rows.
pub async fn owned_by(pool: &SqlitePool, owner_id: chorus_core::UserId) -> Result<Vec<Song>> {
    let rows = sqlx::query(&format!(
        "SELECT {SONG_COLUMNS} FROM songs s WHERE s.owner_id = ?"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(song_from_row).collect())
}

/// The songs this caller may see, newest first
///
/// Anonymous: public only. Authenticated: public plus their own, each song
/// once. Admin: everything, with owner usernames for display.
pub async fn visible(pool: &SqlitePool, caller: &Caller) -> Result<Vec<Song>> {
    if caller.is_admin() {
        return all_with_owner(pool).await;
    }

    let rows = match caller.identity() {
        Some(identity) => {
            sqlx::query(&format!(
                "SELECT {SONG_COLUMNS} FROM songs s
                 WHERE s.is_public = 1 OR s.owner_id = ?
                 ORDER BY s.created_at DESC, s.id DESC"
            ))
            .bind(identity.id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(&format!(
                "SELECT {SONG_COLUMNS} FROM songs s
                 WHERE s.is_public = 1
                 ORDER BY s.created_at DESC, s.id DESC"
            ))
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows.iter().map(song_from_row).collect())
}

/// Single-song fetch under the read gate
///
/// A private song the caller may not read comes back `NotFound`, the same
/// as a missing one.
pub async fn get_visible(pool: &SqlitePool, caller: &Caller, id: SongId) -> Result<Song> {
    match fetch_by_id(pool, id).await? {
        Some(song) if access::can_read_song(caller, &song) => Ok(song),
        _ => Err(ChorusError::not_found("Song", id)),
    }
}

/// Create a song owned by the caller
pub async fn create(pool: &SqlitePool, caller: &Caller, song: CreateSong) -> Result<Song> {
    let identity = access::ensure_authenticated(caller)?;

    if song.title.trim().is_empty() {
        return Err(ChorusError::invalid_input("title must not be empty"));
    }
    if song.source_ref.is_empty() {
        return Err(ChorusError::invalid_input("source_ref must not be empty"));
    }

    let result = sqlx::query(
        "INSERT INTO songs (title, artist, composer, genre, release_date, lyrics, source_ref, is_public, owner_id)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(song.title.trim())
    .bind(&song.artist)
    .bind(&song.composer)
    .bind(&song.genre)
    .bind(&song.release_date)
    .bind(&song.lyrics)
    .bind(&song.source_ref)
    .bind(song.is_public)
    .bind(identity.id)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();

    fetch_by_id(pool, id)
        .await?
        .ok_or_else(|| ChorusError::storage("failed to retrieve created song"))
}

/// Resolve a song for mutation through the given route's scope
///
/// Owner route: a song owned by someone else reads as absent, hiding its
/// existence. Admin route: unscoped lookup behind the admin gate.
async fn resolve_for_mutation(
    pool: &SqlitePool,
    caller: &Caller,
    id: SongId,
    route: MutationRoute,
) -> Result<Song> {
    match route {
        MutationRoute::Owner => {
            access::ensure_authenticated(caller)?;
            match fetch_by_id(pool, id).await? {
                Some(song) if access::can_mutate_song(caller, &song, route) => Ok(song),
                _ => Err(ChorusError::not_found("Song", id)),
            }
        }
        MutationRoute::Admin => {
            access::ensure_admin(caller)?;
            fetch_by_id(pool, id)
                .await?
                .ok_or_else(|| ChorusError::not_found("Song", id))
        }
    }
}

/// Apply a metadata patch to a song
///
/// The patch set is fixed; `is_public` is normalized from its string-like
/// wire form before persisting.
pub async fn update(
    pool: &SqlitePool,
    caller: &Caller,
    id: SongId,
    patch: UpdateSong,
    route: MutationRoute,
) -> Result<Song> {
    let mut song = resolve_for_mutation(pool, caller, id, route).await?;

    if let Some(title) = patch.title {
        if title.trim().is_empty() {
            return Err(ChorusError::invalid_input("title must not be empty"));
        }
        song.title = title.trim().to_string();
    }
    if let Some(artist) = patch.artist {
        song.artist = Some(artist);
    }
    if let Some(composer) = patch.composer {
        song.composer = Some(composer);
    }
    if let Some(genre) = patch.genre {
        song.genre = Some(genre);
    }
    if let Some(release_date) = patch.release_date {
        song.release_date = Some(release_date);
    }
    if let Some(lyrics) = patch.lyrics {
        song.lyrics = Some(lyrics);
    }
    if let Some(flag) = &patch.is_public {
        song.is_public = parse_public_flag(flag)?;
    }

    sqlx::query(
        "UPDATE songs
         SET title = ?, artist = ?, composer = ?, genre = ?, release_date = ?, lyrics = ?, is_public = ?
         WHERE id = ?",
    )
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.composer)
    .bind(&song.genre)
    .bind(&song.release_date)
    .bind(&song.lyrics)
    .bind(song.is_public)
    .bind(song.id)
    .execute(pool)
    .await?;

    Ok(song)
}

/// Delete a song and its membership rows
///
/// Returns the deleted song so the boundary can drop the stored audio
/// behind its `source_ref`.
pub async fn delete(
    pool: &SqlitePool,
    caller: &Caller,
    id: SongId,
    route: MutationRoute,
) -> Result<Song> {
    let song = resolve_for_mutation(pool, caller, id, route).await?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM playlist_songs WHERE song_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(song)
}
