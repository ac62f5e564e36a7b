//! Relay of API traffic to the upstream origin.

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};

use crate::http::request::request_id;
use crate::observability::metrics;
use crate::upstream::{BodyPrefix, CaptureBody, UpstreamClient};

/// Forwards one request upstream and streams the answer back.
#[derive(Clone)]
pub struct ProxyHandler {
    upstream: UpstreamClient,
    capture_limit: usize,
}

impl ProxyHandler {
    pub fn new(upstream: UpstreamClient, capture_limit: usize) -> Self {
        Self {
            upstream,
            capture_limit,
        }
    }

    /// Relay `request`. Upstream status, headers and body pass through
    /// untouched; any failure before response headers arrive becomes one 502.
    ///
    /// `x-request-id` is the one exception: the request-id layers have already
    /// stamped it on the inbound request, so it travels upstream, and they
    /// copy it onto the relayed response if the upstream did not set one.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        let (parts, body) = request.into_parts();
        let request_id = request_id(&parts.headers).to_string();
        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
            .to_string();

        tracing::info!(
            request_id = %request_id,
            method = %parts.method,
            path = %path,
            target = %self.upstream.origin(),
            "Proxying request"
        );

        let response = match self.upstream.send(&parts, body).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    path = %path,
                    kind = e.kind(),
                    error = %e,
                    "Upstream request failed"
                );
                metrics::record_upstream_failure(e.kind());
                return e.into_response();
            }
        };

        let status = response.status();
        tracing::info!(
            request_id = %request_id,
            status = status.as_u16(),
            "Upstream responded"
        );

        let (parts, body) = response.into_parts();
        let body = CaptureBody::new(body, self.capture_limit, move |prefix: BodyPrefix| {
            tracing::debug!(
                request_id = %request_id,
                status = status.as_u16(),
                total_bytes = prefix.total_len,
                truncated = prefix.truncated(),
                outcome = prefix.outcome.as_str(),
                body = %prefix.lossy_text(),
                "Upstream response body"
            );
        });

        Response::from_parts(parts, Body::new(body))
    }
}
