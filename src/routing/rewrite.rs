//! Path rewriting applied before forwarding.
//!
//! Rewrites are plain string transformations on the path. They run once
//! per request and never look at headers or body.

/// How a matched path is transformed for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Forward the path unchanged.
    Keep,
    /// Remove a leading prefix once.
    StripPrefix(String),
    /// Add a prefix in front of the path.
    Prepend(String),
}

impl Rewrite {
    /// Apply the rewrite to `path`.
    ///
    /// `StripPrefix` leaves the path untouched when the prefix is absent and
    /// falls back to `/` when nothing would remain.
    pub fn apply(&self, path: &str) -> String {
        match self {
            Rewrite::Keep => path.to_string(),
            Rewrite::StripPrefix(prefix) => match path.strip_prefix(prefix.as_str()) {
                Some("") => "/".to_string(),
                Some(rest) => rest.to_string(),
                None => path.to_string(),
            },
            Rewrite::Prepend(prefix) => format!("{}{}", prefix, path),
        }
    }
}
