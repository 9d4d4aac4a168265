//! Thin passthrough to the third-party token endpoint.
//!
//! The client secret never exists here: the app uses the PKCE flow, so the
//! proxy only shields the token endpoint behind a redirect allow-list and
//! returns upstream JSON verbatim.

use serde_json::Value;
use tracing::error;

use crate::dto::auth::{TokenExchangeRequest, TokenRefreshRequest, UpstreamTokenError};
use crate::error::ServiceError;
use crate::state::SharedState;

/// Exchange an authorization code (plus PKCE verifier) for tokens.
pub async fn exchange_code(
    state: &SharedState,
    request: TokenExchangeRequest,
) -> Result<Value, ServiceError> {
    if !state.config().is_redirect_allowed(&request.redirect_uri) {
        error!(redirect_uri = %request.redirect_uri, "disallowed redirect_uri attempted");
        return Err(ServiceError::DisallowedRedirect);
    }

    let client_id = state.config().spotify_client_id.clone();
    let params = [
        ("grant_type", "authorization_code".to_string()),
        ("code", request.code),
        ("redirect_uri", request.redirect_uri),
        ("client_id", client_id),
        ("code_verifier", request.code_verifier),
    ];

    forward_token_request(state, &params, "Token exchange failed").await
}

/// Trade a refresh token for a fresh access token.
pub async fn refresh_token(
    state: &SharedState,
    request: TokenRefreshRequest,
) -> Result<Value, ServiceError> {
    let client_id = state.config().spotify_client_id.clone();
    let params = [
        ("grant_type", "refresh_token".to_string()),
        ("refresh_token", request.refresh_token),
        ("client_id", client_id),
    ];

    forward_token_request(state, &params, "Token refresh failed").await
}

/// POST the form to the accounts endpoint and pass the JSON body through
/// verbatim. Upstream failures keep their status code; transport failures
/// surface as a logged 500. Nothing is retried.
async fn forward_token_request(
    state: &SharedState,
    params: &[(&str, String)],
    failure_label: &str,
) -> Result<Value, ServiceError> {
    let url = format!("{}/api/token", state.config().accounts_base_url);

    let response = state
        .http()
        .post(&url)
        .form(params)
        .send()
        .await
        .map_err(|err| {
            error!(error = %err, "token request could not be sent");
            ServiceError::Network(err.to_string())
        })?;

    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<UpstreamTokenError>()
            .await
            .ok()
            .and_then(|body| body.error_description)
            .unwrap_or_else(|| failure_label.into());
        error!(%status, %message, "token endpoint rejected the request");
        return Err(ServiceError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    response.json::<Value>().await.map_err(|err| {
        error!(error = %err, "token endpoint returned a non-JSON body");
        ServiceError::Network(err.to_string())
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::path::PathBuf;

    use axum::{Form, Json, Router, http::StatusCode, routing::post};
    use serde_json::json;
    use tokio::net::TcpListener;

    use super::*;
    use crate::config::AppConfig;
    use crate::state::AppState;

    /// Stand-in accounts endpoint on an ephemeral local port.
    async fn serve_accounts_stub(stub: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, stub).await.unwrap() });
        addr
    }

    fn state_against(accounts_base_url: String) -> SharedState {
        AppState::new(AppConfig {
            spotify_client_id: "test-client".into(),
            allowed_redirect_uris: vec!["http://localhost:8081/callback".into()],
            accounts_base_url,
            static_dir: PathBuf::from("static-build"),
        })
    }

    fn exchange_request() -> TokenExchangeRequest {
        TokenExchangeRequest {
            code: "AQDtq".into(),
            code_verifier: "verifier".into(),
            redirect_uri: "http://localhost:8081/callback".into(),
        }
    }

    #[tokio::test]
    async fn exchange_passes_the_upstream_body_through_verbatim() {
        // Echo the received form back so the grant parameters are observable.
        async fn token(Form(form): Form<HashMap<String, String>>) -> Json<Value> {
            Json(json!({
                "access_token": "at-1",
                "token_type": "Bearer",
                "received": form,
            }))
        }
        let addr = serve_accounts_stub(Router::new().route("/api/token", post(token))).await;
        let state = state_against(format!("http://{addr}"));

        let tokens = exchange_code(&state, exchange_request()).await.unwrap();
        assert_eq!(tokens["access_token"], "at-1");
        assert_eq!(tokens["token_type"], "Bearer");
        assert_eq!(tokens["received"]["grant_type"], "authorization_code");
        assert_eq!(tokens["received"]["client_id"], "test-client");
        assert_eq!(tokens["received"]["code"], "AQDtq");
        assert_eq!(tokens["received"]["code_verifier"], "verifier");
    }

    #[tokio::test]
    async fn refresh_sends_the_refresh_grant() {
        async fn token(Form(form): Form<HashMap<String, String>>) -> Json<Value> {
            Json(json!({ "access_token": "at-2", "received": form }))
        }
        let addr = serve_accounts_stub(Router::new().route("/api/token", post(token))).await;
        let state = state_against(format!("http://{addr}"));

        let request = TokenRefreshRequest {
            refresh_token: "rt-1".into(),
        };
        let tokens = refresh_token(&state, request).await.unwrap();
        assert_eq!(tokens["received"]["grant_type"], "refresh_token");
        assert_eq!(tokens["received"]["refresh_token"], "rt-1");
    }

    #[tokio::test]
    async fn upstream_rejection_keeps_its_status_and_description() {
        async fn token() -> (StatusCode, Json<Value>) {
            (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid authorization code"
                })),
            )
        }
        let addr = serve_accounts_stub(Router::new().route("/api/token", post(token))).await;
        let state = state_against(format!("http://{addr}"));

        let err = exchange_code(&state, exchange_request()).await.unwrap_err();
        match err {
            ServiceError::Upstream { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Invalid authorization code");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_upstream_failure_falls_back_to_the_label() {
        async fn token() -> (StatusCode, &'static str) {
            (StatusCode::INTERNAL_SERVER_ERROR, "boom")
        }
        let addr = serve_accounts_stub(Router::new().route("/api/token", post(token))).await;
        let state = state_against(format!("http://{addr}"));

        let request = TokenRefreshRequest {
            refresh_token: "rt-1".into(),
        };
        let err = refresh_token(&state, request).await.unwrap_err();
        match err {
            ServiceError::Upstream { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Token refresh failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn disallowed_redirect_never_reaches_the_upstream() {
        // No listener behind this origin; the allow-list check must fail first.
        let state = state_against("http://127.0.0.1:9".into());

        let mut request = exchange_request();
        request.redirect_uri = "https://evil.example.test/callback".into();
        let err = exchange_code(&state, request).await.unwrap_err();
        assert!(matches!(err, ServiceError::DisallowedRedirect));
    }
}
