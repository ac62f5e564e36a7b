//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the compiled dispatch table
//! - Select exactly one handler per request path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan over a fixed, tiny table; first match wins
//! - The static handler is the explicit fallback, so lookup is total

use crate::config::RoutesConfig;
use crate::routing::matcher::{ExactPathMatcher, Matcher, PathPrefixMatcher};

/// The handler a request is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteTarget {
    /// Runtime configuration document.
    Config,
    /// Relay to the upstream origin.
    Proxy,
    /// File under the served root.
    Static,
}

impl RouteTarget {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteTarget::Config => "config",
            RouteTarget::Proxy => "proxy",
            RouteTarget::Static => "static",
        }
    }
}

impl std::fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
struct Route {
    matcher: Box<dyn Matcher>,
    target: RouteTarget,
}

/// Priority-ordered dispatch table.
#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
    fallback: RouteTarget,
}

impl Router {
    /// Compile the table: exact config path, then the API prefix, then static.
    pub fn from_config(config: &RoutesConfig) -> Self {
        let routes = vec![
            Route {
                matcher: Box::new(ExactPathMatcher::new(config.config_path.clone())),
                target: RouteTarget::Config,
            },
            Route {
                matcher: Box::new(PathPrefixMatcher::new(config.api_prefix.clone())),
                target: RouteTarget::Proxy,
            },
        ];

        Self {
            routes,
            fallback: RouteTarget::Static,
        }
    }

    /// Select the handler for `path`.
    pub fn match_path(&self, path: &str) -> RouteTarget {
        self.routes
            .iter()
            .find(|route| route.matcher.matches(path))
            .map(|route| route.target)
            .unwrap_or(self.fallback)
    }
}
