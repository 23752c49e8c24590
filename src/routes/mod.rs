use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, Uri},
    routing::get,
};
use tower_http::services::ServeDir;

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
    storage::PUBLIC_MOUNT,
};

pub mod admin;
pub mod auth;
pub mod doc;
pub mod health;
pub mod menus;
pub mod params;
pub mod products;
pub mod public;
pub mod uploads;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/menus", menus::router())
        .nest("/products", products::router())
        .nest("/public", public::router())
        .nest("/admin", admin::router())
        .nest("/uploads", uploads::router())
}

/// Full application: health, `/api`, docs, stored images and the 404 fallback.
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;
    let images = ServeDir::new(state.images.root());

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .nest_service(PUBLIC_MOUNT, images)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
