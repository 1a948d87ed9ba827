//! # Geogate Auth
//!
//! Identity resolution and role-based authorization for the Geogate gateway.
//!
//! Heterogeneous authentication results (directory bind, trusted
//! pre-authentication headers, OAuth2/OIDC logins, test principals) are
//! turned into one canonical [`GatewayUser`](geogate_models::GatewayUser) by
//! an ordered resolver chain, normalized and enriched by an ordered
//! customizer chain, and finally checked against required role sets by the
//! authorization manager.
//!
//! - [`resolvers`]: the [`UserResolver`] trait, the concrete resolvers and
//!   the [`UserMapper`] chain
//! - [`customizers`]: the [`UserCustomizer`] trait and the role-mapping and
//!   role-prefix customizers
//! - [`authorization`]: [`RoleAuthorizationManager`]
//! - [`error`]: error types

pub mod authorization;
pub mod customizers;
pub mod error;
pub mod resolvers;

// Re-export commonly used types at crate root
pub use authorization::RoleAuthorizationManager;
pub use customizers::{RolePrefixCustomizer, RolesMappingCustomizer, UserCustomizer};
pub use error::AuthError;
pub use resolvers::{UserMapper, UserResolver};
