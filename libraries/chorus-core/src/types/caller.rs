/// Caller identity context
///
/// Every access-control decision is evaluated against a `Caller` passed in
/// explicitly; request handlers build one per inbound request.
use super::ids::UserId;
use serde::{Deserialize, Serialize};

/// Authenticated identity attached to a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User ID from the verified token
    pub id: UserId,

    /// Admin role flag, resolved from the user row at request time
    pub is_admin: bool,
}

/// The identity context under which an operation is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// No valid credentials presented
    Anonymous,

    /// Logged-in user (admin or not)
    User(Identity),
}

impl Caller {
    /// Build an authenticated caller
    pub fn user(id: UserId, is_admin: bool) -> Self {
        Self::User(Identity { id, is_admin })
    }

    /// The identity, if authenticated
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::User(identity) => Some(identity),
        }
    }

    /// Whether the caller is logged in
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::User(_))
    }

    /// Whether the caller holds the admin role
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::User(identity) if identity.is_admin)
    }
}
