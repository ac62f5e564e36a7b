//! Outbound client for the upstream origin.
//!
//! # Responsibilities
//! - Build a hyper client that speaks plain HTTP or TLS (rustls)
//! - Rewrite the inbound request into the upstream request
//! - Bound the wait for response headers with a timeout
//!
//! # Design Decisions
//! - One attempt per inbound request, no retries
//! - Request body is handed over as a stream, never buffered
//! - Root certificates come from the platform store; an empty store only
//!   breaks https upstreams, so loading problems are logged, not fatal

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::request::Parts;
use axum::http::{Request, Response};
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::UpstreamConfig;
use crate::upstream::headers::build_outbound_headers;
use crate::upstream::origin::UpstreamOrigin;
use crate::upstream::UpstreamError;

type HttpsClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Client bound to the single upstream origin.
#[derive(Clone)]
pub struct UpstreamClient {
    origin: UpstreamOrigin,
    client: HttpsClient,
    request_timeout: Duration,
}

impl UpstreamClient {
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let origin = UpstreamOrigin::parse(&config.url)?;
        let client = build_client(Duration::from_secs(config.connect_timeout_secs))?;
        tracing::debug!(origin = %origin, tls = origin.is_tls(), "Upstream client ready");

        Ok(Self {
            origin,
            client,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    pub fn origin(&self) -> &UpstreamOrigin {
        &self.origin
    }

    /// Send one request upstream and wait for its response headers.
    ///
    /// The returned body is still streaming; the caller relays it.
    pub async fn send(&self, parts: &Parts, body: Body) -> Result<Response<Incoming>, UpstreamError> {
        let uri = self.origin.target_uri(parts.uri.path_and_query())?;

        let mut request = Request::builder()
            .method(parts.method.clone())
            .uri(uri)
            .body(body)?;
        *request.headers_mut() = build_outbound_headers(&parts.headers, self.origin.host_header());

        match tokio::time::timeout(self.request_timeout, self.client.request(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(UpstreamError::Transport(e)),
            Err(_) => Err(UpstreamError::Timeout(self.request_timeout)),
        }
    }
}

fn build_client(connect_timeout: Duration) -> Result<HttpsClient, UpstreamError> {
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_connect_timeout(Some(connect_timeout));

    let https = HttpsConnectorBuilder::new()
        .with_tls_config(tls_config()?)
        .https_or_http()
        .enable_http1()
        .wrap_connector(http);

    Ok(Client::builder(TokioExecutor::new()).build(https))
}

fn tls_config() -> Result<rustls::ClientConfig, UpstreamError> {
    let native = rustls_native_certs::load_native_certs();
    for error in &native.errors {
        tracing::warn!(error = %error, "Failed to load native root certificate");
    }

    let mut roots = rustls::RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(native.certs);
    tracing::debug!(added, ignored, "Root certificates loaded");

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(config)
}
