//! chat-server library
//!
//! HTTP bootstrap for the chat application: configuration, logging,
//! middleware, health checks and static frontend hosting. The auth and
//! messages endpoints are supplied by the embedding application through
//! [`api::RouteGroups`].

use shadow_rs::shadow;
shadow!(build);

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod server;
pub mod state;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
