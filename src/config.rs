//! Runtime configuration loaded from the environment with baked-in defaults.

use std::env;
use std::path::PathBuf;

use tracing::warn;

/// Environment variable holding the public OAuth client id.
const CLIENT_ID_ENV: &str = "SPOTIFY_CLIENT_ID";
/// Environment variable holding the comma-separated redirect allow-list.
const REDIRECT_URIS_ENV: &str = "ALLOWED_REDIRECT_URIS";
/// Environment variable overriding the accounts origin (tests point it at a stub).
const ACCOUNTS_URL_ENV: &str = "SPOTIFY_ACCOUNTS_URL";
/// Environment variable overriding where the prebuilt client bundle lives.
const STATIC_DIR_ENV: &str = "STATIC_BUILD_DIR";

/// Client id the app ships with; a public identifier, not a secret.
const DEFAULT_CLIENT_ID: &str = "04246e81b0fa44278bfd1821ad90204a";
/// Default accounts origin for token exchange.
const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
/// Default bundle directory relative to the working directory.
const DEFAULT_STATIC_DIR: &str = "static-build";
/// Redirect URIs accepted when the allow-list is not configured.
const DEFAULT_REDIRECT_URIS: [&str; 1] = ["http://localhost:8081/callback"];

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OAuth client id forwarded on every token request.
    pub spotify_client_id: String,
    /// Exact-match allow-list for the `redirect_uri` of token exchanges.
    pub allowed_redirect_uris: Vec<String>,
    /// Origin of the third-party token endpoint.
    pub accounts_base_url: String,
    /// Directory holding the prebuilt client bundle, when present.
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Read the configuration from the environment, falling back to the
    /// built-in defaults for anything unset.
    pub fn from_env() -> Self {
        let spotify_client_id =
            env::var(CLIENT_ID_ENV).unwrap_or_else(|_| DEFAULT_CLIENT_ID.into());

        let allowed_redirect_uris = match env::var(REDIRECT_URIS_ENV) {
            Ok(raw) => {
                let uris: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|uri| !uri.is_empty())
                    .map(Into::into)
                    .collect();
                if uris.is_empty() {
                    warn!("{REDIRECT_URIS_ENV} is set but empty; using defaults");
                    default_redirect_uris()
                } else {
                    uris
                }
            }
            Err(_) => default_redirect_uris(),
        };

        let accounts_base_url = env::var(ACCOUNTS_URL_ENV)
            .unwrap_or_else(|_| DEFAULT_ACCOUNTS_URL.into())
            .trim_end_matches('/')
            .to_string();

        let static_dir = env::var_os(STATIC_DIR_ENV)
            .map(PathBuf::from)
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        Self {
            spotify_client_id,
            allowed_redirect_uris,
            accounts_base_url,
            static_dir,
        }
    }

    /// Exact-match check against the redirect allow-list.
    pub fn is_redirect_allowed(&self, uri: &str) -> bool {
        self.allowed_redirect_uris.iter().any(|allowed| allowed == uri)
    }
}

fn default_redirect_uris() -> Vec<String> {
    DEFAULT_REDIRECT_URIS.iter().map(|uri| uri.to_string()).collect()
}
