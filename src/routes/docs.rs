use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Mount point of the Swagger UI.
const SWAGGER_UI_PATH: &str = "/docs";
/// Path serving the raw OpenAPI document the UI renders.
const OPENAPI_JSON_PATH: &str = "/api-doc/openapi.json";

/// Serve the generated OpenAPI document together with its Swagger UI.
pub fn router(state: SharedState) -> Router<SharedState> {
    let ui = SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi());
    Router::<SharedState>::from(ui).with_state(state)
}
