//! Precompiled path patterns.
//!
//! Two shapes only:
//!
//! | Pattern     | Matches                                   |
//! |-------------|-------------------------------------------|
//! | `/hello*`   | any path starting with `/hello`           |
//! | `/mobile/**`| any path starting with `/mobile/`         |
//! | `/health`   | exactly `/health`                         |
//!
//! Trailing stars collapse into a single prefix test. A `*` anywhere else is an
//! ordinary character. No backtracking, no regex.

use std::fmt;

/// A path pattern compiled once at registration time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathPattern {
    source: String,
    kind: Kind,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Kind {
    Exact(String),
    Prefix(String),
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        let trimmed = pattern.trim_end_matches('*');
        let kind = if trimmed.len() == pattern.len() {
            Kind::Exact(pattern.to_owned())
        } else {
            Kind::Prefix(trimmed.to_owned())
        };
        Self { source: pattern.to_owned(), kind }
    }

    pub fn matches(&self, path: &str) -> bool {
        match &self.kind {
            Kind::Exact(exact) => path == exact,
            Kind::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }

    /// The pattern as it was written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl From<&str> for PathPattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
