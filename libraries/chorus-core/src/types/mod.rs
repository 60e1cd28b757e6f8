//! Domain types for Chorus

mod caller;
mod ids;
mod playlist;
mod song;
mod stats;
mod user;

pub use caller::{Caller, Identity};
pub use ids::{PlaylistId, SongId, UserId};
pub use playlist::Playlist;
pub use song::{parse_public_flag, CreateSong, Song, UpdateSong};
pub use stats::{DashboardReport, GenreCount, Overview, UserSongCount};
pub use user::User;
