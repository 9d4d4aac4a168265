use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the Guess-That-Track backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::auth::exchange_token,
        crate::routes::auth::refresh_token,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::auth::TokenExchangeRequest,
            crate::dto::auth::TokenRefreshRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "OAuth token exchange proxy"),
    )
)]
pub struct ApiDoc;
