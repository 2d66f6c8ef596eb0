//! Route definitions for the DriveBox HTTP API.
//!
//! Authenticated routes are mounted under `/api`; the public share
//! endpoint lives at the root so links stay short.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // The body limit covers the whole multipart request, so a full batch of
    // maximum-size files must fit.
    let max_body = state.config.upload.max_file_size_bytes as usize
        * state.config.upload.max_batch_files.max(1)
        + 1024 * 1024;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(file_routes())
        .merge(stats_routes())
        .merge(health_routes());

    let public_routes =
        Router::new().route("/shared/{token}", get(handlers::share::access_shared));

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .merge(public_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Auth endpoints: register, login
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
}

/// File upload, listing, download, delete, and sharing
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files/upload", post(handlers::file::upload))
        .route("/files", get(handlers::file::list))
        .route("/files/download/{id}", get(handlers::file::download))
        .route("/files/{id}", delete(handlers::file::delete))
        .route("/files/{id}/share", post(handlers::share::create_share))
}

/// Stats and category listing
fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::stats::get_stats))
        .route("/categories", get(handlers::stats::list_categories))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::{HeaderValue, Method};
    use tower_http::cors::{AllowOrigin, Any};

    let cors_config = &state.config.server.cors;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}
