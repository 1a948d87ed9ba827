//! The root gateway configuration document.
//!
//! Loaded once at startup from a YAML file, validated, then shared as an
//! immutable snapshot (`Arc<GatewayConfig>`) for the process lifetime.
//! Reconfiguration means building and validating a new snapshot and swapping
//! it atomically, never mutating in place.

use std::collections::HashMap;
use std::env;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use geogate_models::roles::RoleNormalizationPolicy;

use crate::access_rules::AccessRule;
use crate::headers::HeaderPolicy;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "GEOGATE_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "geogate.yaml";

/// Default expression for the inbound header security filter.
pub const DEFAULT_REMOVE_HEADERS: &str = "(?i)(sec-.*|Authorization)";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// One entry of the gateway route table: requests whose path falls under
/// `path` are forwarded to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub id: String,
    /// Path prefix matched against the request path (longest prefix wins).
    pub path: String,
    /// Destination URI, also the key linking routes to [`ServiceTarget`]s.
    pub target: String,
}

/// Static configuration of one upstream target: optional access rules and
/// optional header-policy overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTarget {
    pub name: String,
    pub target: String,
    /// When non-empty, fully replaces the global access-rule list for this
    /// target. An empty list falls back to the global list.
    #[serde(default)]
    pub access_rules: Vec<AccessRule>,
    /// Field-by-field overrides of the global header policy.
    #[serde(default)]
    pub headers: Option<HeaderPolicy>,
}

/// Role handling for plain OAuth2 logins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Config {
    #[serde(default)]
    pub roles: RoleNormalizationPolicy,
}

/// Role handling for OpenID Connect logins, including non-standard claim
/// extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OidcConfig {
    #[serde(default)]
    pub roles: RoleNormalizationPolicy,
}

/// A named directory source the gateway resolves bind principals against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub name: String,
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,
}

fn default_lookup_timeout() -> u64 {
    5
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Regular expression for the inbound header security filter; a header
    /// is removed when its name or any `name: value` rendering matches.
    #[serde(default = "default_remove_headers")]
    pub remove_headers: String,
    #[serde(default)]
    pub directories: Vec<DirectoryConfig>,
}

fn default_remove_headers() -> String {
    DEFAULT_REMOVE_HEADERS.to_string()
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            remove_headers: default_remove_headers(),
            directories: Vec::new(),
        }
    }
}

/// Root configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
    /// Access rules applied to targets that configure none of their own.
    #[serde(default)]
    pub global_access_rules: Vec<AccessRule>,
    /// Header policy inherited by every target.
    #[serde(default)]
    pub default_headers: HeaderPolicy,
    /// Per-target configuration, in declaration order. Two services sharing
    /// a target URI is a configuration hazard: the first match wins.
    #[serde(default)]
    pub services: Vec<ServiceTarget>,
    /// Canonical role name -> additional roles to union in.
    #[serde(default)]
    pub roles_mappings: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub oauth2: OAuth2Config,
    #[serde(default)]
    pub oidc: OidcConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

impl GatewayConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: GatewayConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load the file named by `GEOGATE_CONFIG`, falling back to
    /// `geogate.yaml` in the working directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }

    /// Startup-time validation; a malformed expression or missing mandatory
    /// field must never surface at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Regex::new(&self.security.remove_headers).map_err(|e| {
            ConfigError::Invalid(format!("security.remove_headers is not a valid regex: {e}"))
        })?;

        for route in &self.routes {
            if route.id.trim().is_empty() {
                return Err(ConfigError::Invalid("route with empty id".into()));
            }
            if !route.path.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "route '{}': path must start with '/'",
                    route.id
                )));
            }
            if route.target.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "route '{}': empty target",
                    route.id
                )));
            }
        }

        for service in &self.services {
            if service.target.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "service '{}': empty target",
                    service.name
                )));
            }
            validate_rules(&service.access_rules, &service.name)?;
        }
        validate_rules(&self.global_access_rules, "global_access_rules")?;

        for policy in [&self.oauth2.roles, &self.oidc.roles] {
            for path in &policy.claim_paths {
                if !path.starts_with("$.") || path.len() == 2 {
                    return Err(ConfigError::Invalid(format!(
                        "claim path '{path}' must be of the form $.claim[.nested]"
                    )));
                }
            }
        }

        for (role, extra) in &self.roles_mappings {
            if extra.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "roles_mappings entry '{role}' maps to no roles"
                )));
            }
        }

        Ok(())
    }

    /// First configured service whose target URI equals `target` exactly.
    pub fn find_service(&self, target: &str) -> Option<&ServiceTarget> {
        self.services.iter().find(|s| s.target == target)
    }
}

fn validate_rules(rules: &[AccessRule], context: &str) -> Result<(), ConfigError> {
    for rule in rules {
        if rule.intercept_url.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "{context}: access rule without intercept_url"
            )));
        }
        if !rule.anonymous && rule.allowed_roles.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "{context}: access rule is neither anonymous nor lists allowed_roles"
            )));
        }
    }
    Ok(())
}
