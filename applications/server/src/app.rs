/// Router assembly
use crate::{api, middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full application router
///
/// Every /api route runs through the caller middleware, which resolves the
/// Authorization header into a `Caller` without rejecting anonymous
/// requests; the per-route guards decide what each caller may do.
pub fn create_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        // Auth
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/refresh", post(api::auth::refresh))
        .route("/auth/me", get(api::auth::me))
        // Songs
        .route("/songs", get(api::songs::list_songs))
        .route("/songs", post(api::songs::upload_song))
        .route("/songs/:id", get(api::songs::get_song))
        .route("/songs/:id", put(api::songs::update_song))
        .route("/songs/:id", delete(api::songs::delete_song))
        // Playlists
        .route("/playlists", get(api::playlists::list_playlists))
        .route("/playlists", post(api::playlists::create_playlist))
        .route("/playlists/:id", get(api::playlists::get_playlist))
        .route("/playlists/:id", put(api::playlists::rename_playlist))
        .route("/playlists/:id", delete(api::playlists::delete_playlist))
        .route(
            "/playlists/:id/songs",
            post(api::playlists::add_song_to_playlist),
        )
        .route(
            "/playlists/:id/songs/:song_id",
            delete(api::playlists::remove_song_from_playlist),
        )
        // Admin
        .route("/admin/users", get(api::admin::list_users))
        .route("/admin/users/:id/role", put(api::admin::change_role))
        .route("/admin/users/:id", delete(api::admin::delete_user))
        .route("/admin/songs", get(api::admin::list_all_songs))
        .route("/admin/songs/:id", put(api::admin::update_song))
        .route("/admin/songs/:id", delete(api::admin::delete_song))
        .route("/admin/dashboard", get(api::admin::dashboard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::caller_middleware,
        ));

    let media_dir = app_state.media_storage.base_path().clone();

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/media", ServeDir::new(media_dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
