//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path only)
//!     → router.rs (ordered table lookup)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: Config | Proxy | Static
//!
//! Route Compilation (at startup):
//!     RoutesConfig
//!     → exact config path (highest priority)
//!     → API prefix
//!     → static fallback
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same path always selects the same handler
//! - First match wins, so the exact config path is never shadowed

pub mod matcher;
pub mod router;

pub use router::{RouteTarget, Router};
