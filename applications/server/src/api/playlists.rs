/// Playlists API routes
///
/// All playlist routes operate on the caller's own playlists; there is no
/// admin view into someone else's playlist.
use crate::{error::Result, middleware::CallerContext, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use chorus_core::types::{Playlist, PlaylistId, Song, SongId};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenamePlaylistRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddSongRequest {
    pub song_id: SongId,
}

/// GET /api/playlists
pub async fn list_playlists(
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
) -> Result<Json<Vec<Playlist>>> {
    let playlists = chorus_storage::playlists::list_for(&app_state.pool, &caller).await?;
    Ok(Json(playlists))
}

/// POST /api/playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<Json<Playlist>> {
    let playlist = chorus_storage::playlists::create(&app_state.pool, &caller, &req.name).await?;
    Ok(Json(playlist))
}

/// GET /api/playlists/:id
pub async fn get_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
) -> Result<Json<Playlist>> {
    let playlist = chorus_storage::playlists::get_with_songs(&app_state.pool, &caller, id).await?;
    Ok(Json(playlist))
}

/// PUT /api/playlists/:id
pub async fn rename_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
    Json(req): Json<RenamePlaylistRequest>,
) -> Result<Json<Playlist>> {
    let playlist =
        chorus_storage::playlists::rename(&app_state.pool, &caller, id, &req.name).await?;
    Ok(Json(playlist))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
) -> Result<Json<serde_json::Value>> {
    chorus_storage::playlists::delete(&app_state.pool, &caller, id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/playlists/:id/songs
///
/// Adding a song twice answers 409 with an isDuplicate flag rather than a
/// generic failure.
pub async fn add_song_to_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
    Json(req): Json<AddSongRequest>,
) -> Result<Json<Song>> {
    let song =
        chorus_storage::playlists::add_song(&app_state.pool, &caller, id, req.song_id).await?;
    Ok(Json(song))
}

/// DELETE /api/playlists/:id/songs/:song_id
pub async fn remove_song_from_playlist(
    Path((id, song_id)): Path<(PlaylistId, SongId)>,
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
) -> Result<Json<serde_json::Value>> {
    chorus_storage::playlists::remove_song(&app_state.pool, &caller, id, song_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
