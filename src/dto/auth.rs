use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Body of `POST /api/spotify/token`: the PKCE authorization-code exchange.
///
/// Fields default to empty strings so an omitted field reaches the length
/// validation (a 400) instead of dying in JSON deserialization (a 422).
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct TokenExchangeRequest {
    /// Authorization code returned by the authorize redirect.
    #[serde(default)]
    #[validate(length(min = 1, message = "code must not be empty"))]
    pub code: String,
    /// PKCE verifier matching the challenge sent on authorize.
    #[serde(default)]
    #[validate(length(min = 1, message = "code_verifier must not be empty"))]
    pub code_verifier: String,
    /// Redirect URI used on authorize; must match the allow-list exactly.
    #[serde(default)]
    #[validate(length(min = 1, message = "redirect_uri must not be empty"))]
    pub redirect_uri: String,
}

/// Body of `POST /api/spotify/refresh`.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct TokenRefreshRequest {
    /// Refresh token issued by a previous exchange.
    #[serde(default)]
    #[validate(length(min = 1, message = "refresh_token must not be empty"))]
    pub refresh_token: String,
}

/// Error body shape the upstream token endpoint answers with.
#[derive(Debug, Deserialize)]
pub struct UpstreamTokenError {
    /// Human readable failure description.
    #[serde(default)]
    pub error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_fail_validation() {
        let request = TokenExchangeRequest {
            code: String::new(),
            code_verifier: "verifier".into(),
            redirect_uri: "http://localhost:8081/callback".into(),
        };
        assert!(request.validate().is_err());

        let request = TokenRefreshRequest {
            refresh_token: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn omitted_fields_deserialize_empty_and_fail_validation() {
        let request: TokenExchangeRequest = serde_json::from_str(
            r#"{"code_verifier": "verifier", "redirect_uri": "http://localhost:8081/callback"}"#,
        )
        .unwrap();
        assert!(request.code.is_empty());
        assert!(request.validate().is_err());

        let request: TokenRefreshRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn populated_requests_pass_validation() {
        let request = TokenExchangeRequest {
            code: "AQDtq".into(),
            code_verifier: "verifier".into(),
            redirect_uri: "http://localhost:8081/callback".into(),
        };
        assert!(request.validate().is_ok());
    }
}
