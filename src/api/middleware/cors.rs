//! Cross-origin policy for the browser client.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use super::request_id::REQUEST_ID_HEADER;
use crate::config::Settings;

/// Build the CORS layer for the resolved environment.
///
/// Methods and headers mirror the preflight request, which is the only
/// permissive option compatible with credentials.
pub fn cors_layer(settings: &Settings) -> CorsLayer {
    let origins = settings.cors_origins();

    if origins.is_empty() && settings.environment.is_production() {
        tracing::warn!(
            "CLIENT_URL is not set; cross-origin requests will be rejected in production"
        );
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring CORS origin that is not a valid header value");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(settings.cors.allow_credentials)
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(settings.cors.max_age))
}
