//! Route matching logic.
//!
//! # Responsibilities
//! - Match the request path exactly
//! - Match a request path prefix
//!
//! # Design Decisions
//! - Only the path participates; method, headers and query never do
//! - Path matching is case-sensitive
//! - No regex to guarantee O(n) matching

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches one path exactly.
#[derive(Debug, Clone)]
pub struct ExactPathMatcher {
    path: String,
}

impl ExactPathMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Matcher for ExactPathMatcher {
    fn matches(&self, path: &str) -> bool {
        path == self.path
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matcher() {
        let matcher = ExactPathMatcher::new("/config/azure-storage.json");

        assert!(matcher.matches("/config/azure-storage.json"));
        assert!(!matcher.matches("/config/azure-storage.json/"));
        assert!(!matcher.matches("/config/AZURE-storage.json")); // Case sensitive
        assert!(!matcher.matches("/config"));
    }

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/api/");

        assert!(matcher.matches("/api/v1/interviews"));
        assert!(matcher.matches("/api/"));
        assert!(!matcher.matches("/api"));
        assert!(!matcher.matches("/images/api/logo.png"));
    }
}
