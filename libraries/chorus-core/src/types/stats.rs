/// Admin dashboard report types
use super::song::Song;
use serde::{Deserialize, Serialize};

/// Headline counts for the admin dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    pub total_users: i64,
    pub total_songs: i64,
    pub total_playlists: i64,
    pub public_songs: i64,
    pub private_songs: i64,
    pub admin_users: i64,
}

/// Songs per genre (null genres excluded)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: i64,
}

/// Songs uploaded per user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSongCount {
    pub username: String,
    pub count: i64,
}

/// Full dashboard payload; produced as a unit, never partially
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub overview: Overview,
    pub genre_stats: Vec<GenreCount>,
    pub user_stats: Vec<UserSongCount>,
    pub recent_songs: Vec<Song>,
}
