//! Conversion of failures into the `{"message": ...}` JSON body.
//!
//! Three entry points produce that body:
//! - [`AppError`]'s `IntoResponse`, for errors returned by handlers
//! - [`handle_panic`], for handlers that panic (wired via `CatchPanicLayer`)
//! - [`global_error_handler`], which rewrites error responses produced by
//!   axum or tower-http layers (405, 408, 413, ...) that carry no JSON body

use std::any::Any;

use axum::{
    Json,
    extract::Request,
    http::{
        HeaderMap, StatusCode,
        header::{CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;
use crate::error::{AppError, INTERNAL_ERROR_MESSAGE};

/// Build a JSON error response.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

/// The generic 500 response.
pub fn internal_error_response() -> Response {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database { .. }
            | AppError::Configuration { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    /// Server-side variants are logged with their source and reported with
    /// the generic message; the rest expose their own message.
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            AppError::NotFound { message }
            | AppError::BadRequest { message }
            | AppError::Unauthorized { message }
            | AppError::Forbidden { message }
            | AppError::ServiceUnavailable { message } => message,
            AppError::Validation { field, reason } => format!("{}: {}", field, reason),
            AppError::PayloadTooLarge => canonical_message(StatusCode::PAYLOAD_TOO_LARGE),
            AppError::Database { operation, source } => {
                tracing::error!(operation = %operation, error = ?source, "Server Error");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            AppError::Configuration { key, source } => {
                tracing::error!(key = %key, error = ?source, "Server Error");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            AppError::Internal { source } => {
                tracing::error!(error = ?source, "Server Error");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        json_error(status, message)
    }
}

/// `CatchPanicLayer` callback: logs the panic and answers with the generic 500.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(panic = %detail, "Server Error");
    internal_error_response()
}

/// Rewrite bodiless or non-JSON error responses into `ErrorResponse`.
///
/// A 500 is always replaced by the generic body, even when it already
/// carries JSON, so internal details never reach the client. Other JSON
/// error bodies are passed through untouched.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }
    if status != StatusCode::INTERNAL_SERVER_ERROR && is_json(response.headers()) {
        return response;
    }

    let (mut parts, _body) = response.into_parts();
    for header in [CONTENT_TYPE, CONTENT_LENGTH, CONTENT_ENCODING] {
        parts.headers.remove(header);
    }

    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        INTERNAL_ERROR_MESSAGE.to_string()
    } else {
        canonical_message(status)
    };

    (parts, Json(ErrorResponse::new(message))).into_response()
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn canonical_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
