//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the edge gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The single upstream origin API traffic is relayed to.
    pub upstream: UpstreamConfig,

    /// Paths that select the config and proxy handlers.
    pub routes: RoutesConfig,

    /// Static asset serving.
    pub static_files: StaticFilesConfig,

    /// Storage values surfaced verbatim by the config endpoint.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin URL, scheme and authority only (e.g., "https://api.example.net").
    pub url: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Time allowed until the upstream's response headers arrive, in seconds.
    pub request_timeout_secs: u64,

    /// How many bytes of each relayed response body are kept for the debug log.
    pub diagnostic_capture_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "https://synapsencebackend-dzceeafvbwgca8br.westus2-01.azurewebsites.net"
                .to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
            diagnostic_capture_bytes: 200,
        }
    }
}

/// Path rules for the dispatch table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RoutesConfig {
    /// Exact path served by the config handler.
    pub config_path: String,

    /// Path prefix relayed to the upstream.
    pub api_prefix: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            config_path: "/config/azure-storage.json".to_string(),
            api_prefix: "/api/".to_string(),
        }
    }
}

/// Static asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory assets are served from.
    pub root: PathBuf,

    /// Document served for `/`.
    pub index_file: String,

    /// Extra extension → MIME entries, keys include the leading dot.
    /// Entries here override the built-in table.
    pub content_types: BTreeMap<String, String>,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index_file: "index.html".to_string(),
            content_types: BTreeMap::new(),
        }
    }
}

/// Storage values handed to the browser. Empty when unset.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    pub sas_token: String,
    pub blob_url: String,
    pub account_name: String,
    pub container_name: String,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Pretty for terminals, JSON for log shippers.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
