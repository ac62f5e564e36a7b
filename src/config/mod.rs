//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file)
//!     → loader.rs (environment, then command-line overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → handed to each handler at construction
//! ```
//!
//! # Design Decisions
//! - Read once at startup, never reloaded
//! - All fields have defaults to allow minimal configs
//! - Handlers never read the process environment themselves

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ConfigOverrides};
pub use schema::GatewayConfig;
pub use schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, RoutesConfig, StaticFilesConfig,
    StorageConfig, UpstreamConfig,
};
