//! Chorus Core
//!
//! Platform-agnostic domain types, error handling, and the access-control
//! core for Chorus, a multi-user music-sharing server.
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Song`, `Playlist`, `Caller`
//! - **Access Control**: pure allow/deny decisions over (caller, resource)
//! - **Error Handling**: unified `ChorusError` and `Result` types
//!
//! All caller/session data is passed explicitly as arguments; nothing in this
//! crate holds ambient state or touches a database.

#![forbid(unsafe_code)]

pub mod access;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use access::MutationRoute;
pub use error::{ChorusError, Result};
pub use types::{Caller, Identity, Playlist, Song, User};
pub use types::{PlaylistId, SongId, UserId};
