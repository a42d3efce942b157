use axum::response::{IntoResponse, Redirect};
use axum::Json;
use serde_json::json;

/// The image page is the default authenticated landing page.
pub async fn index() -> impl IntoResponse {
    Redirect::to("/image")
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "media-studio",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
