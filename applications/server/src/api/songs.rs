/// Songs API routes
use crate::{
    error::{Result, ServerError},
    middleware::{AuthenticatedUser, CallerContext},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use chorus_core::types::{CreateSong, Song, SongId, UpdateSong};
use chorus_core::MutationRoute;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct SongsResponse {
    pub songs: Vec<Song>,
    pub total: usize,
}

/// Client-supplied metadata for an upload
///
/// Deliberately has no `source_ref`; the server derives it from the stored
/// file and ignores any the client tries to smuggle in.
#[derive(Debug, Deserialize)]
pub struct UploadMetadata {
    pub title: String,
    pub artist: Option<String>,
    pub composer: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<String>,
    pub lyrics: Option<String>,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

/// GET /api/songs
///
/// The listing depends on who asks: anonymous callers get public songs,
/// authenticated callers additionally get their own, admins get everything.
pub async fn list_songs(
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
) -> Result<Json<SongsResponse>> {
    let songs = chorus_storage::songs::visible(&app_state.pool, &caller).await?;
    let total = songs.len();

    Ok(Json(SongsResponse { songs, total }))
}

/// GET /api/songs/:id
pub async fn get_song(
    Path(id): Path<SongId>,
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
) -> Result<Json<Song>> {
    let song = chorus_storage::songs::get_visible(&app_state.pool, &caller, id).await?;
    Ok(Json(song))
}

/// POST /api/songs
///
/// Multipart upload with a "file" part (the audio) and a "metadata" part
/// (JSON). The stored file's reference goes into the song row; the caller
/// becomes the owner no matter what the metadata claims.
pub async fn upload_song(
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
    _auth: AuthenticatedUser,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<Song>> {
    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::BadRequest("Missing Content-Type".to_string()))?;

    if !content_type.starts_with("multipart/form-data") {
        return Err(ServerError::BadRequest(
            "Expected multipart/form-data".to_string(),
        ));
    }

    let boundary = content_type
        .split("boundary=")
        .nth(1)
        .ok_or_else(|| ServerError::BadRequest("Missing boundary".to_string()))?
        .to_string();

    // Convert Bytes to a stream for multer
    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut metadata_json: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to parse multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = Some(field.file_name().unwrap_or("upload").to_string());
                file_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| {
                            ServerError::BadRequest(format!("Failed to read file: {}", e))
                        })?
                        .to_vec(),
                );
            }
            "metadata" => {
                metadata_json = Some(field.text().await.map_err(|e| {
                    ServerError::BadRequest(format!("Failed to read metadata: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let file_data = file_data.ok_or_else(|| ServerError::BadRequest("Missing file".to_string()))?;
    let file_name = file_name.unwrap_or_else(|| "upload".to_string());
    let metadata_json =
        metadata_json.ok_or_else(|| ServerError::BadRequest("Missing metadata".to_string()))?;

    let metadata: UploadMetadata = serde_json::from_str(&metadata_json)
        .map_err(|e| ServerError::BadRequest(format!("Invalid metadata: {}", e)))?;

    let source_ref = app_state.media_storage.store(&file_name, &file_data).await?;
    let new_song = CreateSong {
        title: metadata.title,
        artist: metadata.artist,
        composer: metadata.composer,
        genre: metadata.genre,
        release_date: metadata.release_date,
        lyrics: metadata.lyrics,
        source_ref: source_ref.clone(),
        is_public: metadata.is_public,
    };

    match chorus_storage::songs::create(&app_state.pool, &caller, new_song).await {
        Ok(song) => Ok(Json(song)),
        Err(e) => {
            // The row never landed, so the file should not linger either
            if let Err(cleanup) = app_state.media_storage.delete(&source_ref).await {
                tracing::warn!("Failed to clean up orphaned upload: {}", cleanup);
            }
            Err(e.into())
        }
    }
}

/// PUT /api/songs/:id
///
/// Owner-scoped: a song the caller does not own reads as absent, admins
/// included. The admin counterpart lives under /api/admin/songs.
pub async fn update_song(
    Path(id): Path<SongId>,
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
    Json(patch): Json<UpdateSong>,
) -> Result<Json<Song>> {
    let song =
        chorus_storage::songs::update(&app_state.pool, &caller, id, patch, MutationRoute::Owner)
            .await?;
    Ok(Json(song))
}

/// DELETE /api/songs/:id
pub async fn delete_song(
    Path(id): Path<SongId>,
    State(app_state): State<AppState>,
    CallerContext(caller): CallerContext,
) -> Result<Json<serde_json::Value>> {
    let song =
        chorus_storage::songs::delete(&app_state.pool, &caller, id, MutationRoute::Owner).await?;

    if let Err(e) = app_state.media_storage.delete(&song.source_ref).await {
        tracing::warn!("Failed to delete media for song {}: {}", song.id, e);
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
