//! # Geogate
//!
//! A reverse-proxy gateway for a geospatial data infrastructure, built with
//! Rust and Axum. Its core is a request-time identity resolution and
//! role-based authorization pipeline: heterogeneous authentication results
//! become one canonical user, roles are normalized and enriched under
//! configurable policy, and per-route configuration decides whether a
//! request may proceed and which identity headers the proxied call carries.
//!
//! ## Architecture
//!
//! The workspace splits into a gateway application and three library
//! crates:
//!
//! ```text
//! crates/
//! ├── geogate-models/   # canonical user, authentication input, role policy
//! ├── geogate-auth/     # resolver chain, customizer chain, authorization
//! └── geogate-config/   # routes, services, access rules, header policy
//! src/
//! ├── middleware/       # pipeline stages sharing one request context
//! ├── proxy.rs          # upstream forwarding
//! ├── whoami.rs         # identity diagnostics endpoint
//! ├── router.rs         # stage wiring
//! └── state.rs          # immutable configuration snapshot + chains
//! ```
//!
//! ## Request pipeline
//!
//! Every request traverses, in order: route matching, identity resolution,
//! target resolution, access control, outgoing header policy, proxy call.
//! Stage order is declared relative to each stage's predecessor in
//! [`middleware`] and the stages communicate through a strongly-typed
//! per-request context, never through ambient state.
//!
//! ## Identity sources
//!
//! - directory bind (accounts looked up through an injected capability)
//! - trusted pre-authentication headers from an upstream SSO proxy
//! - OAuth2 authorization-code logins
//! - OpenID Connect ID tokens, with configurable claim-to-role extraction
//!
//! Whatever the source, authorization always falls back to the raw granted
//! authorities when no resolver recognizes the authentication, so a
//! protected route stays decidable.
//!
//! ## Configuration
//!
//! One YAML document (see `GEOGATE_CONFIG`) declares routes, per-service
//! access rules and header policies, role mappings and the role
//! normalization policy. The document is validated at startup and shared
//! as an immutable snapshot for the process lifetime.

pub mod logging;
pub mod middleware;
pub mod proxy;
pub mod router;
pub mod state;
pub mod utils;
pub mod whoami;

// Re-export workspace crates for convenience
pub use geogate_auth;
pub use geogate_config;
pub use geogate_models;
