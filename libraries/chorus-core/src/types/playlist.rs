/// Playlist domain type
use super::ids::{PlaylistId, UserId};
use super::song::Song;
use serde::{Deserialize, Serialize};

/// Playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Owner user ID; immutable after creation
    pub owner_id: UserId,

    /// Creation timestamp (ISO string)
    pub created_at: String,

    /// Member songs (optional, populated when needed)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub songs: Option<Vec<Song>>,
}
