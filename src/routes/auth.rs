use axum::{Json, Router, extract::State, routing::post};
use axum_valid::Valid;
use serde_json::Value;

use crate::{
    dto::auth::{TokenExchangeRequest, TokenRefreshRequest},
    error::AppError,
    services::auth_service,
    state::SharedState,
};

/// OAuth proxy routes, nested under `/api`.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/spotify/token", post(exchange_token))
        .route("/spotify/refresh", post(refresh_token))
}

/// Exchange an authorization code for tokens via the accounts endpoint.
#[utoipa::path(
    post,
    path = "/api/spotify/token",
    tag = "auth",
    request_body = TokenExchangeRequest,
    responses(
        (status = 200, description = "Upstream token response, passed through verbatim"),
        (status = 400, description = "Missing fields or disallowed redirect_uri"),
        (status = 500, description = "Upstream unreachable")
    )
)]
pub async fn exchange_token(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<TokenExchangeRequest>>,
) -> Result<Json<Value>, AppError> {
    let tokens = auth_service::exchange_code(&state, payload).await?;
    Ok(Json(tokens))
}

/// Refresh an access token via the accounts endpoint.
#[utoipa::path(
    post,
    path = "/api/spotify/refresh",
    tag = "auth",
    request_body = TokenRefreshRequest,
    responses(
        (status = 200, description = "Upstream token response, passed through verbatim"),
        (status = 400, description = "Missing refresh_token"),
        (status = 500, description = "Upstream unreachable")
    )
)]
pub async fn refresh_token(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<TokenRefreshRequest>>,
) -> Result<Json<Value>, AppError> {
    let tokens = auth_service::refresh_token(&state, payload).await?;
    Ok(Json(tokens))
}
