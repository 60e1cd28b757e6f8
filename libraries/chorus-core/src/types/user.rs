/// User domain type
use super::ids::UserId;
use serde::{Deserialize, Serialize};

/// User account
///
/// The password hash lives in a separate credentials table and is never
/// carried on this type, so it cannot leak through a serialized response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Login name (unique, non-empty)
    pub username: String,

    /// Admin role flag
    pub is_admin: bool,

    /// Account creation timestamp (ISO string)
    pub created_at: String,
}
