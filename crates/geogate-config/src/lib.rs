//! # Geogate Config
//!
//! Configuration types for the Geogate gateway.
//!
//! The gateway loads one YAML document at startup, validates it, and shares
//! it as an immutable snapshot for the process lifetime:
//!
//! - [`gateway`]: the root [`GatewayConfig`] document, loading and validation
//! - [`access_rules`]: role-based access rules with ant-style URL patterns
//! - [`headers`]: identity header emission policy and its merge semantics
//! - [`target`]: per-destination resolution of access rules and headers
//!
//! # Example
//!
//! ```ignore
//! use geogate_config::GatewayConfig;
//!
//! let config = GatewayConfig::from_env()?;
//! let target = config.resolve_target("http://geoserver:8080/geoserver");
//! ```

pub mod access_rules;
pub mod gateway;
pub mod headers;
pub mod target;

// Re-export commonly used types at crate root
pub use access_rules::AccessRule;
pub use gateway::{
    ConfigError, DirectoryConfig, GatewayConfig, OAuth2Config, OidcConfig, RouteConfig,
    SecurityConfig, ServiceTarget,
};
pub use headers::HeaderPolicy;
pub use target::ResolvedTarget;
