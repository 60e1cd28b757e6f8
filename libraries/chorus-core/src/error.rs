/// Core error types for Chorus
use thiserror::Error;

/// Result type alias using `ChorusError`
pub type Result<T> = std::result::Result<T, ChorusError>;

/// Core error type for Chorus
///
/// Business-rule denials are separate variants so the HTTP boundary can map
/// each to a distinct status code; store failures stay opaque (`Storage` /
/// `Database`) and never masquerade as a business error.
#[derive(Error, Debug)]
pub enum ChorusError {
    /// Caller is not logged in
    #[error("authentication required")]
    Unauthenticated,

    /// Caller is logged in but lacks the required privilege
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Entity absent, or deliberately hidden by an ownership-scoped lookup
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The (playlist, song) pair already exists
    #[error("\"{song_title}\" is already in \"{playlist_name}\"")]
    DuplicateMembership {
        song_title: String,
        playlist_name: String,
    },

    /// Validation failure (empty name, malformed boolean, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An admin may not change their own role
    #[error("you cannot change your own role")]
    SelfRoleChange,

    /// An admin may not delete their own account
    #[error("you cannot delete your own account")]
    SelfDeletion,

    /// Storage-related errors
    #[error("storage error: {0}")]
    Storage(String),

    /// Database errors (for storage implementations)
    #[error("database error: {0}")]
    Database(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl ChorusError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for ChorusError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
