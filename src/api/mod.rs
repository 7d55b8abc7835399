//! HTTP layer: router assembly, middleware, handlers and DTOs.

pub mod doc;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

/// Cookie extractor for handlers mounted in the route groups.
pub use axum_extra::extract::cookie::{Cookie, CookieJar};
pub use routes::{RouteGroups, create_router};
