/// Common test utilities and fixtures
use chorus_core::types::User;
use chorus_server::{
    app::create_router,
    services::{AuthService, MediaStorage},
    state::AppState,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestApp {
    pub router: axum::Router,
    pub auth_service: Arc<AuthService>,
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

/// Build a full application against a throwaway database and media dir
pub async fn create_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();

    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}", db_path.display());
    let pool = chorus_storage::create_pool(&db_url).await.unwrap();
    chorus_storage::run_migrations(&pool).await.unwrap();

    let media_storage = MediaStorage::new(temp_dir.path().join("media"));
    media_storage.initialize().await.unwrap();

    let auth_service = Arc::new(AuthService::new(
        "test-secret-key".to_string(),
        1, // 1 hour access
        1, // 1 day refresh
    ));

    let app_state = AppState::new(
        pool.clone(),
        Arc::clone(&auth_service),
        Arc::new(media_storage),
    );

    TestApp {
        router: create_router(app_state),
        auth_service,
        pool,
        _temp_dir: temp_dir,
    }
}

impl TestApp {
    /// Create a user directly in the database and return it with a token
    pub async fn create_user(&self, username: &str, password: &str, is_admin: bool) -> (User, String) {
        let hash = self.auth_service.hash_password(password).unwrap();
        let user = chorus_storage::users::create(&self.pool, username, &hash, is_admin)
            .await
            .unwrap();
        let token = self.auth_service.create_access_token(user.id).unwrap();
        (user, token)
    }
}
