//! Static file serving.

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio_util::io::ReaderStream;

use crate::assets::{AssetError, AssetStore};
use crate::http::response::disable_caching;

/// Streams files from the served root.
#[derive(Debug, Clone)]
pub struct StaticHandler {
    store: AssetStore,
}

impl StaticHandler {
    pub fn new(store: AssetStore) -> Self {
        Self { store }
    }

    /// Serve the file for `path`: 200 with its bytes, 404 if missing, 500 otherwise.
    pub async fn serve(&self, path: &str) -> Response {
        let asset = match self.store.open(path).await {
            Ok(asset) => asset,
            Err(e) => {
                match &e {
                    AssetError::NotFound(_) => tracing::debug!(path = %path, "File not found"),
                    AssetError::OutsideRoot(_) => {
                        tracing::warn!(path = %path, "Path traversal attempt blocked")
                    }
                    AssetError::Io { .. } => {
                        tracing::error!(path = %path, error = %e, "Failed to open file")
                    }
                }
                return e.into_response();
            }
        };

        let mut response = Response::new(Body::from_stream(ReaderStream::new(asset.file)));
        *response.status_mut() = StatusCode::OK;

        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, asset.content_type);
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(asset.len));
        disable_caching(&mut response);

        response
    }
}
