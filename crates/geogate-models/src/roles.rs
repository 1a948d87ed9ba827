//! Role name constants and the configurable role normalization policy.
//!
//! Raw role material arrives in different shapes per authentication source:
//! dotted authority strings from OAuth2 providers, directory group names,
//! arbitrary claim values from ID tokens. This module turns them into
//! canonical role names under a caller-configured policy.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical prefix carried by every effective role name.
pub const ROLE_PREFIX: &str = "ROLE_";

/// Base role implicitly granted to every authenticated user.
pub const DEFAULT_ROLE: &str = "ROLE_USER";

/// Add the canonical prefix unless it is already present.
pub fn ensure_role_prefix(role: &str) -> String {
    if role.starts_with(ROLE_PREFIX) {
        role.to_string()
    } else {
        format!("{ROLE_PREFIX}{role}")
    }
}

/// Replace every maximal run of non-alphanumeric characters with a single
/// underscore, trimming surrounding whitespace first.
pub fn normalize_separators(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;
    for c in raw.trim().chars() {
        if c.is_alphanumeric() {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Normalize, uppercase and prefix a raw role name unconditionally.
///
/// This is the treatment applied to a provider's standard granted-authority
/// list on OIDC logins, where the configurable flags only govern roles
/// extracted from non-standard claims.
pub fn fully_normalize(raw: &str) -> String {
    ensure_role_prefix(&normalize_separators(raw).to_uppercase())
}

fn default_true() -> bool {
    true
}

/// Configurable transformation of raw role strings into canonical role
/// names, plus the claim-extraction settings for OIDC-sourced roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleNormalizationPolicy {
    /// Add the canonical `ROLE_` prefix when absent.
    #[serde(default = "default_true")]
    pub prefix: bool,
    /// Uppercase the role name.
    #[serde(default = "default_true")]
    pub uppercase: bool,
    /// Collapse runs of non-alphanumeric characters to a single `_`.
    #[serde(default = "default_true")]
    pub normalize: bool,
    /// Union claim-derived roles after the standard authorities; when false,
    /// claim-derived roles replace the standard set.
    #[serde(default = "default_true")]
    pub append: bool,
    /// Delimiter that breaks each extracted claim string into multiple role
    /// candidates before normalization.
    #[serde(default)]
    pub split: Option<String>,
    /// Ordered `$.`-path expressions selecting role material from the ID
    /// token claim set.
    #[serde(default)]
    pub claim_paths: Vec<String>,
}

impl Default for RoleNormalizationPolicy {
    fn default() -> Self {
        Self {
            prefix: true,
            uppercase: true,
            normalize: true,
            append: true,
            split: None,
            claim_paths: Vec::new(),
        }
    }
}

impl RoleNormalizationPolicy {
    /// Transform one raw role string under this policy's flags.
    pub fn apply(&self, raw: &str) -> String {
        let mut role = raw.trim().to_string();
        if self.normalize {
            role = normalize_separators(&role);
        }
        if self.uppercase {
            role = role.to_uppercase();
        }
        if self.prefix {
            role = ensure_role_prefix(&role);
        }
        role
    }

    /// Pull role candidates out of an ID token claim set.
    ///
    /// Each configured path expression is evaluated in order; string and
    /// string-array values contribute candidates, each optionally split on
    /// the configured delimiter, and every candidate goes through
    /// [`Self::apply`]. Output order is expression order, then split order.
    pub fn extract_claim_roles(&self, claims: &Map<String, Value>) -> Vec<String> {
        let mut roles = Vec::new();
        for path in &self.claim_paths {
            for raw in lookup_claim(claims, path) {
                match &self.split {
                    Some(delimiter) => {
                        for part in raw.split(delimiter.as_str()) {
                            let part = part.trim();
                            if !part.is_empty() {
                                roles.push(self.apply(part));
                            }
                        }
                    }
                    None => {
                        if !raw.trim().is_empty() {
                            roles.push(self.apply(&raw));
                        }
                    }
                }
            }
        }
        roles
    }

    /// Whether claim extraction is configured at all.
    pub fn extracts_claims(&self) -> bool {
        !self.claim_paths.is_empty()
    }
}

/// Evaluate a `$.a.b` path expression against a claim set, collecting string
/// values (arrays are flattened).
fn lookup_claim(claims: &Map<String, Value>, path: &str) -> Vec<String> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    let mut current = None;
    let mut map = Some(claims);
    for segment in path.split('.') {
        current = map.and_then(|m| m.get(segment));
        map = current.and_then(Value::as_object);
    }
    let mut values = Vec::new();
    if let Some(value) = current {
        collect_strings(value, &mut values);
    }
    values
}

fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => {
            for item in items {
                collect_strings(item, out);
            }
        }
        _ => {}
    }
}
