//! # Geogate Models
//!
//! Domain models for the Geogate gateway.
//!
//! This crate provides the data structures shared by the identity resolution
//! pipeline and the gateway application:
//!
//! - [`user`]: the canonical gateway user, independent of the originating
//!   authentication mechanism
//! - [`authentication`]: the read-only authentication input handed to the
//!   pipeline by the security layer
//! - [`roles`]: role name constants and the configurable role normalization
//!   policy
//!
//! # Example
//!
//! ```ignore
//! use geogate_models::{Authentication, AuthenticationSource, GatewayUser};
//! use geogate_models::roles::RoleNormalizationPolicy;
//!
//! let policy = RoleNormalizationPolicy::default();
//! assert_eq!(policy.apply("GP.TEST.SAMPLE"), "ROLE_GP_TEST_SAMPLE");
//! ```

pub mod authentication;
pub mod roles;
pub mod user;

// Re-export commonly used types at crate root for convenience
pub use authentication::{Authentication, AuthenticationSource};
pub use roles::{DEFAULT_ROLE, ROLE_PREFIX, RoleNormalizationPolicy, ensure_role_prefix};
pub use user::GatewayUser;
