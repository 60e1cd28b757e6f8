/// Shared application state
use crate::services::{AuthService, MediaStorage};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub media_storage: Arc<MediaStorage>,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        auth_service: Arc<AuthService>,
        media_storage: Arc<MediaStorage>,
    ) -> Self {
        Self {
            pool,
            auth_service,
            media_storage,
        }
    }
}
