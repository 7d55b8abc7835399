//! Handling for requests no route matched.
//!
//! Unknown `/api` paths get a JSON 404. In production every other GET is
//! answered from the built frontend, with `index.html` standing in for
//! client-side routes.

use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::api::middleware::{internal_error_response, json_error};
use crate::config::FrontendConfig;
use crate::error::AppError;
use crate::state::AppState;

const API_PREFIX: &str = "/api";

/// Whether `path` belongs to the JSON API namespace.
///
/// `/api` and `/api/...` do; `/apiary` does not.
pub fn is_api_path(path: &str) -> bool {
    match path.strip_prefix(API_PREFIX) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Static files of the built single-page application.
#[derive(Clone, Debug)]
pub struct SpaAssets {
    service: ServeDir<ServeFile>,
    index: PathBuf,
}

impl SpaAssets {
    /// Serve `dist_dir`, answering unknown paths with `dist_dir/index_file`.
    pub fn new(dist_dir: impl AsRef<Path>, index_file: &str) -> Self {
        let dist_dir = dist_dir.as_ref();
        let index = dist_dir.join(index_file);
        let service = ServeDir::new(dist_dir).fallback(ServeFile::new(&index));
        Self { service, index }
    }

    pub fn from_config(config: &FrontendConfig) -> Self {
        Self::new(config.dist_path(), &config.index_file)
    }

    pub fn index_path(&self) -> &Path {
        &self.index
    }

    /// Serve an asset, or `index.html` with 200 when none matches.
    ///
    /// A missing or unreadable `index.html` is a deployment error: it is
    /// logged and the client gets the generic 500. The index is checked up
    /// front because `ServeDir` commits to a 200 before reading the body.
    pub async fn serve(&self, request: Request) -> Response {
        if let Err(e) = self.check_index().await {
            return self.index_error(&e);
        }

        match self.service.clone().oneshot(request).await {
            Ok(response)
                if response.status() == StatusCode::NOT_FOUND
                    || response.status().is_server_error() =>
            {
                self.index_error(&format!("static service answered {}", response.status()))
            }
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        }
    }

    async fn check_index(&self) -> std::io::Result<()> {
        let file = tokio::fs::File::open(&self.index).await?;
        if file.metadata().await?.is_file() {
            Ok(())
        } else {
            Err(std::io::Error::other("not a regular file"))
        }
    }

    fn index_error(&self, error: &dyn std::fmt::Display) -> Response {
        tracing::error!(
            index = %self.index.display(),
            error = %error,
            "Error serving index.html"
        );
        internal_error_response()
    }
}

/// Router fallback.
pub async fn fallback(State(state): State<AppState>, request: Request) -> Response {
    if is_api_path(request.uri().path()) {
        return AppError::api_not_found().into_response();
    }

    if let Some(spa) = state.spa.as_ref() {
        if matches!(*request.method(), Method::GET | Method::HEAD) {
            return spa.serve(request).await;
        }
    }

    json_error(StatusCode::NOT_FOUND, "Not Found")
}
