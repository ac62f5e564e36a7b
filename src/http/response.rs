//! Response construction and error mapping.
//!
//! # Responsibilities
//! - Fixed text responses for every terminal error
//! - Map upstream and asset errors to status codes
//!
//! # Design Decisions
//! - Upstream failures of any kind become 502; upstream 4xx/5xx are relayed, not mapped here
//! - A path escaping the served root is answered like a missing file

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::assets::AssetError;
use crate::upstream::UpstreamError;

pub const BAD_GATEWAY_BODY: &str = "Bad Gateway";
pub const NOT_FOUND_BODY: &str = "File not found";
pub const SERVER_ERROR_BODY: &str = "Server error";

/// `Cache-Control` value on config and static responses.
pub const NO_CACHE: &str = "no-cache";

pub fn bad_gateway() -> Response {
    (StatusCode::BAD_GATEWAY, BAD_GATEWAY_BODY).into_response()
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}

pub fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_BODY).into_response()
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        bad_gateway()
    }
}

impl IntoResponse for AssetError {
    fn into_response(self) -> Response {
        match self {
            AssetError::NotFound(_) | AssetError::OutsideRoot(_) => not_found(),
            AssetError::Io { .. } => server_error(),
        }
    }
}

/// Insert `Cache-Control: no-cache`.
pub fn disable_caching(response: &mut Response) {
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
}
