use super::handlers::{health, me, protected, root};
use crate::auth::{AuthenticatedUser, ClaimFlag};
use axum::response::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(root::root, protected::protected, me::me, health::health),
    components(schemas(health::Health, me::Me, AuthenticatedUser, ClaimFlag)),
    tags(
        (name = "saasgate", description = "Pages gated by the Saasform session"),
        (name = "health", description = "Service status")
    )
)]
pub struct ApiDoc;

/// `OpenAPI` document for every served route.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub(super) async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi())
}
