//! Regex-based inbound header stripping.
//!
//! One expression drives a dual-mode match: a header is removed when its
//! name alone matches, or when any rendered `"name: value"` string matches.
//! The first mode blanket-strips sensitive header families (`sec-*`,
//! `Authorization`), the second allows finer name+value matching with the
//! same expression. The default gateway wiring applies this to every
//! inbound request so no client-supplied value can impersonate the
//! canonical identity header space.

use axum::http::{HeaderMap, HeaderName};
use regex::Regex;
use tracing::trace;

/// Compiled header-removal filter.
#[derive(Debug, Clone)]
pub struct HeaderFilter {
    pattern: Regex,
}

impl HeaderFilter {
    /// Compile `pattern` as a whole-string match (`^pattern$`), so
    /// `sec-.*` cannot accidentally hit `x-sec-like` names by substring.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self { pattern })
    }

    fn matches(&self, rendered: &str) -> bool {
        self.pattern.is_match(rendered)
    }

    /// Remove every header matched by name or by any `name: value`
    /// rendering.
    pub fn remove_matching(&self, headers: &mut HeaderMap) {
        let names: Vec<HeaderName> = headers.keys().cloned().collect();
        for name in names {
            let matched = self.matches(name.as_str())
                || headers.get_all(&name).iter().any(|value| {
                    value
                        .to_str()
                        .is_ok_and(|v| self.matches(&format!("{name}: {v}")))
                });
            if matched {
                trace!(header = %name, "removing header");
                headers.remove(&name);
            }
        }
    }
}
