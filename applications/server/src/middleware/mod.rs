/// Server middleware
pub mod auth;

pub use auth::{caller_middleware, AuthenticatedUser, CallerContext};
