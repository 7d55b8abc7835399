//! Middleware components for request processing.
//!
//! Request ID tracking, request logging, CORS and error normalisation.

mod cors;
mod error_handler;
mod logging;
mod request_id;

pub use cors::cors_layer;
pub use error_handler::{
    global_error_handler, handle_panic, internal_error_response, json_error,
};
pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
