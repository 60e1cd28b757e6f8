//! User management queries and guards
//!
//! Role changes and account deletion run through the access-control core
//! first; deletion cascades the user's songs, playlists, and memberships
//! inside one transaction (children before parent).

use chorus_core::access;
use chorus_core::error::{ChorusError, Result};
use chorus_core::types::{Caller, User, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        is_admin: row.get::<i64, _>("is_admin") != 0,
        created_at: row.get("created_at"),
    }
}

/// Create a user with credentials
///
/// The user row and password hash are inserted in one transaction; a
/// username collision surfaces as `InvalidInput` so registration can answer
/// 400 instead of 500.
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    is_admin: bool,
) -> Result<User> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ChorusError::invalid_input("username must not be empty"));
    }

    let mut tx = pool.begin().await?;

    let result = sqlx::query("INSERT INTO users (username, is_admin) VALUES (?, ?)")
        .bind(username)
        .bind(is_admin)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                ChorusError::invalid_input(format!("username already taken: {username}"))
            }
            _ => ChorusError::from(e),
        })?;

    let id = result.last_insert_rowid();

    sqlx::query("INSERT INTO user_credentials (user_id, password_hash) VALUES (?, ?)")
        .bind(id)
        .bind(password_hash)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| ChorusError::storage("failed to retrieve created user"))
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, username, is_admin, created_at FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| user_from_row(&r)))
}

/// Get user by username (login lookup)
pub async fn get_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row =
        sqlx::query("SELECT id, username, is_admin, created_at FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

    Ok(row.map(|r| user_from_row(&r)))
}

/// Get a user's password hash for authentication
pub async fn get_password_hash(pool: &SqlitePool, user_id: UserId) -> Result<Option<String>> {
    let row = sqlx::query("SELECT password_hash FROM user_credentials WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.get("password_hash")))
}

/// Get all users, newest first
///
/// Ungated read; the admin boundary applies `ensure_admin` before calling,
/// and the CLI uses it directly.
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(
        "SELECT id, username, is_admin, created_at FROM users ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(user_from_row).collect())
}

/// Change a user's admin flag
///
/// Denied with `SelfRoleChange` when the caller targets themselves, even
/// for admins; otherwise requires the admin role.
pub async fn set_role(
    pool: &SqlitePool,
    caller: &Caller,
    target: UserId,
    is_admin: bool,
) -> Result<User> {
    let change = access::change_user_role(caller, target, is_admin)?;

    let result = sqlx::query("UPDATE users SET is_admin = ? WHERE id = ?")
        .bind(change.is_admin)
        .bind(change.user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ChorusError::not_found("User", target));
    }

    get_by_id(pool, target)
        .await?
        .ok_or_else(|| ChorusError::not_found("User", target))
}

/// Delete a user and everything they own
///
/// Memberships, playlists, songs, and credentials go before the user row,
/// all inside one transaction, so a concurrent reader either sees the full
/// account or none of it.
pub async fn delete(pool: &SqlitePool, caller: &Caller, target: UserId) -> Result<()> {
    access::allow_delete_user(caller, target)?;

    let mut tx = pool.begin().await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
        .bind(target)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(ChorusError::not_found("User", target));
    }

    // Memberships referencing the user's playlists or songs
    sqlx::query(
        "DELETE FROM playlist_songs
         WHERE playlist_id IN (SELECT id FROM playlists WHERE owner_id = ?)
            OR song_id IN (SELECT id FROM songs WHERE owner_id = ?)",
    )
    .bind(target)
    .bind(target)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM playlists WHERE owner_id = ?")
        .bind(target)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM songs WHERE owner_id = ?")
        .bind(target)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM user_credentials WHERE user_id = ?")
        .bind(target)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(target)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}
