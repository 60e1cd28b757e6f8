//! Chorus Server Library
//!
//! Multi-user music sharing server with authentication, per-user content
//! ownership, and an admin surface.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use app::create_router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{auth::AuthService, media_storage::MediaStorage};
pub use state::AppState;
