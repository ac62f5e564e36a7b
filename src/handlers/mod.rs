//! Request handlers, one per routing target.
//!
//! Each handler is built from the startup configuration and holds only
//! immutable state; none of them reads the process environment.

pub mod config;
pub mod proxy;
pub mod static_files;

pub use config::{ConfigHandler, StorageDocument};
pub use proxy::ProxyHandler;
pub use static_files::StaticHandler;
