//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the upstream is a bare origin (scheme + authority)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a loaded configuration, collecting every violation.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    validate_upstream_url(&config.upstream.url, &mut errors);

    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "upstream.connect_timeout_secs",
            "must be greater than zero",
        ));
    }
    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "upstream.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    if !config.routes.config_path.starts_with('/') {
        errors.push(ValidationError::new(
            "routes.config_path",
            "must start with '/'",
        ));
    }
    if !config.routes.api_prefix.starts_with('/') {
        errors.push(ValidationError::new("routes.api_prefix", "must start with '/'"));
    }

    let index = &config.static_files.index_file;
    if index.is_empty() || index.contains('/') || index == "." || index == ".." {
        errors.push(ValidationError::new(
            "static_files.index_file",
            "must be a single file name",
        ));
    }

    for (extension, mime) in &config.static_files.content_types {
        if !extension.starts_with('.') {
            errors.push(ValidationError::new(
                "static_files.content_types",
                format!("extension '{}' must include the leading dot", extension),
            ));
        }
        if HeaderValue::from_str(mime).is_err() {
            errors.push(ValidationError::new(
                "static_files.content_types",
                format!("'{}' is not a valid header value", mime),
            ));
        }
    }

    if config.observability.log_level.parse::<tracing::Level>().is_err() {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_upstream_url(raw: &str, errors: &mut Vec<ValidationError>) {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            errors.push(ValidationError::new(
                "upstream.url",
                format!("'{}' is not a URL: {}", raw, e),
            ));
            return;
        }
    };

    if !matches!(url.scheme(), "http" | "https") {
        errors.push(ValidationError::new(
            "upstream.url",
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        errors.push(ValidationError::new("upstream.url", "missing host"));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        errors.push(ValidationError::new(
            "upstream.url",
            "must be an origin without path, query or fragment",
        ));
    }
}
