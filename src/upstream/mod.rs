//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (parts + streaming body)
//!     → headers.rs (fresh header map, Host rewritten)
//!     → origin.rs (origin + inbound path and query)
//!     → client.rs (one attempt, bounded by a timeout)
//!     → Upstream response (streaming body)
//!     → capture.rs (forward untouched, keep a bounded prefix for logs)
//! ```

pub mod capture;
pub mod client;
pub mod headers;
pub mod origin;

use std::time::Duration;

use thiserror::Error;

pub use capture::{BodyPrefix, CaptureBody, CaptureOutcome};
pub use client::UpstreamClient;
pub use origin::UpstreamOrigin;

/// Errors while talking to the upstream origin.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Origin URL could not be used.
    #[error("invalid upstream origin: {0}")]
    InvalidOrigin(String),

    /// TLS client setup failed.
    #[error("TLS setup failed: {0}")]
    Tls(#[from] rustls::Error),

    /// Connection refused, reset, DNS failure, TLS handshake failure.
    #[error("upstream request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    /// No response headers within the request timeout.
    #[error("upstream timed out after {0:?}")]
    Timeout(Duration),

    /// The outbound request could not be assembled.
    #[error("could not build upstream request: {0}")]
    InvalidRequest(#[from] axum::http::Error),
}

impl UpstreamError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::InvalidOrigin(_) => "invalid_origin",
            UpstreamError::Tls(_) => "tls",
            UpstreamError::Transport(e) if e.is_connect() => "connect",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::InvalidRequest(_) => "invalid_request",
        }
    }
}
