//! Route matching logic.
//!
//! # Responsibilities
//! - Match path prefix (case-sensitive)
//! - Match exact paths
//! - Match the single-segment short-code shape
//! - Combine conditions with OR semantics
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - No regex to guarantee O(n) matching
//! - Matchers see only the path and method, never the body

use axum::http::Method;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, method: &Method, path: &str) -> bool;
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
    fn matches(&self, _method: &Method, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Matches one literal path.
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
    fn matches(&self, _method: &Method, path: &str) -> bool {
        path == self.path
    }
}

/// Matches `/{code}` where `code` is exactly `len` ASCII alphanumerics.
#[derive(Debug, Clone)]
pub struct ShortCodeMatcher {
    len: usize,
}

impl ShortCodeMatcher {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Matcher for ShortCodeMatcher {
    fn matches(&self, _method: &Method, path: &str) -> bool {
        match path.strip_prefix('/') {
            Some(code) => {
                code.len() == self.len && code.bytes().all(|b| b.is_ascii_alphanumeric())
            }
            None => false,
        }
    }
}

/// Combines multiple matchers with OR semantics.
#[derive(Debug)]
pub struct AnyMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AnyMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AnyMatcher {
    fn matches(&self, method: &Method, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(method, path))
    }
}
