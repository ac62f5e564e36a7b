//! Runtime configuration document for the browser.

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;
use crate::http::response::disable_caching;

/// The JSON document served at the config path. Every field is always present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StorageDocument {
    pub sas_token: String,
    pub blob_url: String,
    pub account_name: String,
    pub container_name: String,
}

impl From<&StorageConfig> for StorageDocument {
    fn from(storage: &StorageConfig) -> Self {
        Self {
            sas_token: storage.sas_token.clone(),
            blob_url: storage.blob_url.clone(),
            account_name: storage.account_name.clone(),
            container_name: storage.container_name.clone(),
        }
    }
}

/// Serves the pre-rendered storage document.
#[derive(Debug, Clone)]
pub struct ConfigHandler {
    body: Bytes,
}

impl ConfigHandler {
    /// Render the document once; the config never changes afterwards.
    pub fn new(storage: &StorageConfig) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(&StorageDocument::from(storage))?;
        Ok(Self {
            body: Bytes::from(body),
        })
    }

    /// 200 with the JSON document, whatever the method.
    pub fn respond(&self) -> Response {
        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = StatusCode::OK;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        disable_caching(&mut response);
        response
    }
}
