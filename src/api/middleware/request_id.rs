//! Request ID middleware.
//!
//! Every request carries an `x-request-id`: the client's value when it is a
//! sensible token, otherwise a fresh UUID v4. The ID is stored in request
//! extensions and echoed on the response.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID stored in request extensions for downstream access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| is_acceptable(v))
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

fn is_acceptable(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Extension, Router, body::Body, middleware, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(id): Extension<RequestId>| async move { id.0 }),
            )
            .layer(middleware::from_fn(request_id_middleware))
    }

    async fn call(header: Option<&str>) -> (String, String) {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(REQUEST_ID_HEADER, value);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let echoed = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_string();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (echoed, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_generates_uuid_when_missing() {
        let (echoed, seen) = call(None).await;
        assert_eq!(echoed, seen);
        assert!(Uuid::parse_str(&echoed).is_ok());
    }

    #[tokio::test]
    async fn test_propagates_client_id() {
        let (echoed, seen) = call(Some("req-42.abc")).await;
        assert_eq!(echoed, "req-42.abc");
        assert_eq!(seen, "req-42.abc");
    }

    #[tokio::test]
    async fn test_replaces_unreasonable_ids() {
        let too_long = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        for bad in ["has space", "<script>", too_long.as_str()] {
            let (echoed, _) = call(Some(bad)).await;
            assert_ne!(echoed, bad);
            assert!(Uuid::parse_str(&echoed).is_ok());
        }
    }
}
