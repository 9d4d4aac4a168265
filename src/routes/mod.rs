use axum::{Json, Router, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::state::SharedState;

pub mod auth;
pub mod docs;
pub mod health;

/// Compose all route trees: the `/api` proxy, health, documentation, and the
/// static client bundle (when one has been built).
pub fn router(state: SharedState) -> Router<()> {
    let api_router = Router::new().nest("/api", auth::router());

    let app = api_router
        .merge(health::router())
        .merge(docs::router(state.clone()))
        .with_state(state.clone());

    let static_dir = &state.config().static_dir;
    if static_dir.is_dir() {
        info!(path = %static_dir.display(), "serving client bundle");
        let index = ServeFile::new(static_dir.join("index.html"));
        app.fallback_service(ServeDir::new(static_dir).fallback(index))
    } else {
        info!(
            path = %static_dir.display(),
            "no client bundle found; API-only mode"
        );
        app.fallback(bundle_unavailable)
    }
}

/// Answer for non-API paths while no client bundle is deployed.
async fn bundle_unavailable() -> impl IntoResponse {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": "client bundle not available" })),
    )
}
