//! The fixed upstream origin.

use std::str::FromStr;

use axum::http::header::HeaderValue;
use axum::http::uri::{Authority, PathAndQuery, Scheme, Uri};
use url::Url;

use crate::upstream::UpstreamError;

/// Scheme and authority of the single upstream, fixed at startup.
#[derive(Debug, Clone)]
pub struct UpstreamOrigin {
    scheme: Scheme,
    authority: Authority,
    host_header: HeaderValue,
}

impl UpstreamOrigin {
    /// Parse an origin such as `https://api.example.net` or `http://127.0.0.1:5090`.
    pub fn parse(raw: &str) -> Result<Self, UpstreamError> {
        let url = Url::parse(raw)
            .map_err(|e| UpstreamError::InvalidOrigin(format!("{}: {}", raw, e)))?;

        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => {
                return Err(UpstreamError::InvalidOrigin(format!(
                    "unsupported scheme '{}'",
                    other
                )))
            }
        };

        let host = url
            .host_str()
            .ok_or_else(|| UpstreamError::InvalidOrigin(format!("{}: missing host", raw)))?;

        // `Url::port` is None for the scheme's default port, so this is the
        // value a browser would send as Host.
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let host_header = HeaderValue::from_str(&authority)
            .map_err(|e| UpstreamError::InvalidOrigin(format!("{}: {}", authority, e)))?;
        let authority = Authority::from_str(&authority)
            .map_err(|e| UpstreamError::InvalidOrigin(format!("{}: {}", authority, e)))?;

        Ok(Self {
            scheme,
            authority,
            host_header,
        })
    }

    /// Value for the outbound `Host` header.
    pub fn host_header(&self) -> &HeaderValue {
        &self.host_header
    }

    pub fn is_tls(&self) -> bool {
        self.scheme == Scheme::HTTPS
    }

    /// Origin + inbound path and query, unchanged.
    pub fn target_uri(&self, path_and_query: Option<&PathAndQuery>) -> Result<Uri, UpstreamError> {
        let path_and_query = path_and_query
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(UpstreamError::InvalidRequest)
    }
}

impl std::fmt::Display for UpstreamOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}
