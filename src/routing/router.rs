//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up matching route for request
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) ordered scan (the table holds a handful of rules)
//! - Explicit NotFound rather than silent default

use axum::http::Method;

use crate::config::BackendsConfig;
use crate::routing::matcher::{
    AnyMatcher, ExactPathMatcher, Matcher, PathPrefixMatcher, ShortCodeMatcher,
};
use crate::routing::rewrite::Rewrite;
use crate::routing::target::BackendTarget;

/// Length of a short code served by the redirect service.
pub const SHORT_CODE_LEN: usize = 8;

/// Path answered locally as a liveness probe.
pub const HEALTH_PATH: &str = "/health";

/// What a matched rule does with the request.
#[derive(Debug)]
pub enum RouteAction {
    /// Forward to a backend after rewriting the path.
    Proxy {
        target: BackendTarget,
        rewrite: Rewrite,
    },
    /// Answer with the local health response.
    LocalHealth,
}

/// One entry in the route table.
#[derive(Debug)]
pub struct RouteRule {
    name: &'static str,
    matcher: Box<dyn Matcher>,
    action: RouteAction,
}

impl RouteRule {
    pub fn new(name: &'static str, matcher: Box<dyn Matcher>, action: RouteAction) -> Self {
        Self {
            name,
            matcher,
            action,
        }
    }
}

/// Outcome of classifying one request.
#[derive(Debug, PartialEq, Eq)]
pub enum Classification<'a> {
    /// Proxy to `target` using the rewritten `path`.
    Forward {
        rule: &'static str,
        target: &'a BackendTarget,
        path: String,
    },
    /// Serve the local health response.
    Health,
    /// No rule applies.
    NotFound,
}

/// Ordered, immutable route table.
#[derive(Debug)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// Build a table from rules in priority order.
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// The gateway's fixed table:
    /// 1. `/api/generate*`, `/api/delete*` → link service, strip `/api`
    /// 2. `/api/stats*` → stats service, strip `/api`
    /// 3. `/{8 alphanumerics}` → redirect service, prepend `/redirect`
    /// 4. `/health` → local
    pub fn from_config(backends: &BackendsConfig) -> Result<Self, String> {
        let link = BackendTarget::parse("link", &backends.link)?;
        let stats = BackendTarget::parse("stats", &backends.stats)?;
        let redirect = BackendTarget::parse("redirect", &backends.redirect)?;

        Ok(Self::new(vec![
            RouteRule::new(
                "link",
                Box::new(AnyMatcher::new(vec![
                    Box::new(PathPrefixMatcher::new("/api/generate")),
                    Box::new(PathPrefixMatcher::new("/api/delete")),
                ])),
                RouteAction::Proxy {
                    target: link,
                    rewrite: Rewrite::StripPrefix("/api".into()),
                },
            ),
            RouteRule::new(
                "stats",
                Box::new(PathPrefixMatcher::new("/api/stats")),
                RouteAction::Proxy {
                    target: stats,
                    rewrite: Rewrite::StripPrefix("/api".into()),
                },
            ),
            RouteRule::new(
                "redirect",
                Box::new(ShortCodeMatcher::new(SHORT_CODE_LEN)),
                RouteAction::Proxy {
                    target: redirect,
                    rewrite: Rewrite::Prepend("/redirect".into()),
                },
            ),
            RouteRule::new(
                "health",
                Box::new(ExactPathMatcher::new(HEALTH_PATH)),
                RouteAction::LocalHealth,
            ),
        ]))
    }

    /// Find the first rule matching the request.
    pub fn match_request(&self, method: &Method, path: &str) -> Option<&RouteRule> {
        self.rules.iter().find(|r| r.matcher.matches(method, path))
    }

    /// Classify a request. Pure: no I/O, no state.
    pub fn classify(&self, method: &Method, path: &str) -> Classification<'_> {
        match self.match_request(method, path) {
            Some(rule) => match &rule.action {
                RouteAction::Proxy { target, rewrite } => Classification::Forward {
                    rule: rule.name,
                    target,
                    path: rewrite.apply(path),
                },
                RouteAction::LocalHealth => Classification::Health,
            },
            None => Classification::NotFound,
        }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}
