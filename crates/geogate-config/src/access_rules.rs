//! Role-based access rules.

use serde::{Deserialize, Serialize};

/// Requirement that a caller hold at least one of a role set to reach the
/// URLs matched by `intercept_url`, or that the URLs are open to anonymous
/// callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    /// Ant-style URL patterns this rule applies to (`/admin/**`, `/ws/*`).
    pub intercept_url: Vec<String>,
    /// When set, matched URLs require no authentication at all.
    #[serde(default)]
    pub anonymous: bool,
    /// Roles of which the caller must hold at least one. Accepted with or
    /// without the canonical prefix.
    #[serde(default)]
    pub allowed_roles: Vec<String>,
}

impl AccessRule {
    /// Whether any of this rule's patterns matches the request path.
    pub fn matches(&self, path: &str) -> bool {
        self.intercept_url.iter().any(|p| pattern_matches(p, path))
    }
}

/// Ant-style pattern match: `*` matches one path segment, a trailing `**`
/// matches any remainder (including none).
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut i = 0;
    for (idx, seg) in pattern_segments.iter().enumerate() {
        if *seg == "**" {
            // only supported as the final segment
            return idx == pattern_segments.len() - 1;
        }
        match path_segments.get(i) {
            Some(p) if *seg == "*" || seg == p => i += 1,
            _ => return false,
        }
    }
    i == path_segments.len()
}
