use axum::Json;
use utoipa::OpenApi;

pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chat Server",
        description = "HTTP API of the chat application",
    ),
    paths(
        crate::api::handlers::health::health_check,
        crate::api::handlers::health::readiness_check,
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::api::dto::HealthResponse,
            crate::api::dto::HealthStatus,
        )
    ),
    tags(
        (name = HEALTH_TAG, description = "Liveness and readiness probes"),
    )
)]
pub struct ApiDoc;

/// `GET /api/openapi.json`
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
