/// Admin API routes
///
/// Every route here requires the admin role. Song routes use the
/// admin-scoped mutation path, which reaches any song regardless of owner;
/// user routes carry the self-protection rules (no self role change, no
/// self deletion).
use crate::{error::Result, middleware::CallerContext, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use chorus_core::types::{DashboardReport, Song, SongId, UpdateSong, User, UserId};
use chorus_core::{access, MutationRoute};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub is_admin: bool,
}

/// GET /api/admin/users
pub async fn list_users(
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
) -> Result<Json<Vec<User>>> {
    access::ensure_admin(&caller)?;

    let users = chorus_storage::users::get_all(&app_state.pool).await?;
    Ok(Json(users))
}

/// PUT /api/admin/users/:id/role
pub async fn change_role(
    Path(id): Path<UserId>,
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
    Json(req): Json<ChangeRoleRequest>,
) -> Result<Json<User>> {
    let user = chorus_storage::users::set_role(&app_state.pool, &caller, id, req.is_admin).await?;
    Ok(Json(user))
}

/// DELETE /api/admin/users/:id
///
/// Removes the account and everything it owns: songs, playlists, and the
/// membership rows pointing at them.
pub async fn delete_user(
    Path(id): Path<UserId>,
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
) -> Result<Json<serde_json::Value>> {
    // Collect the victim's source refs before the rows disappear
    let songs = chorus_storage::songs::owned_by(&app_state.pool, id).await?;

    chorus_storage::users::delete(&app_state.pool, &caller, id).await?;

    for song in songs {
        if let Err(e) = app_state.media_storage.delete(&song.source_ref).await {
            tracing::warn!("Failed to delete media for song {}: {}", song.id, e);
        }
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

/// GET /api/admin/songs
pub async fn list_all_songs(
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
) -> Result<Json<Vec<Song>>> {
    access::ensure_admin(&caller)?;

    let songs = chorus_storage::songs::all_with_owner(&app_state.pool).await?;
    Ok(Json(songs))
}

/// PUT /api/admin/songs/:id
pub async fn update_song(
    Path(id): Path<SongId>,
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
    Json(patch): Json<UpdateSong>,
) -> Result<Json<Song>> {
    let song =
        chorus_storage::songs::update(&app_state.pool, &caller, id, patch, MutationRoute::Admin)
            .await?;
    Ok(Json(song))
}

/// DELETE /api/admin/songs/:id
pub async fn delete_song(
    Path(id): Path<SongId>,
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
) -> Result<Json<serde_json::Value>> {
    let song =
        chorus_storage::songs::delete(&app_state.pool, &caller, id, MutationRoute::Admin).await?;

    if let Err(e) = app_state.media_storage.delete(&song.source_ref).await {
        tracing::warn!("Failed to delete media for song {}: {}", song.id, e);
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

/// GET /api/admin/dashboard
pub async fn dashboard(
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
) -> Result<Json<DashboardReport>> {
    let report = chorus_storage::dashboard::report(&app_state.pool, &caller).await?;
    Ok(Json(report))
}
