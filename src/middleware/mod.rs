//! The per-request pipeline: stage ordering and the shared request context.
//!
//! Every inbound request traverses a fixed-relative-order sequence of
//! stages sharing one strongly-typed [`RequestContext`]:
//!
//! ```text
//! route matching -> identity resolution -> target resolution
//!     -> access control -> outgoing header policy -> proxy call
//! ```
//!
//! Each stage declares its position as an offset from its required
//! predecessor, so inserting a new stage cannot silently reorder existing
//! ones. A stage reading an attribute its predecessor did not populate is a
//! wiring defect and panics; that signals deployment misconfiguration, not
//! a user-facing condition.

pub mod access;
pub mod headers;
pub mod remove_headers;
pub mod resolve_target;
pub mod resolve_user;
pub mod route_match;

use geogate_config::ResolvedTarget;
use geogate_models::{Authentication, GatewayUser};

pub const ROUTE_MATCH_ORDER: i32 = 0;
pub const RESOLVE_USER_ORDER: i32 = ROUTE_MATCH_ORDER + 1;
pub const RESOLVE_TARGET_ORDER: i32 = RESOLVE_USER_ORDER + 1;
pub const ACCESS_CONTROL_ORDER: i32 = RESOLVE_TARGET_ORDER + 1;
pub const HEADER_POLICY_ORDER: i32 = ACCESS_CONTROL_ORDER + 1;

/// The route chosen for this request before the identity stages run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute {
    pub id: String,
    /// Destination URI; also the key into the per-service configuration.
    pub target: String,
}

/// Mutable per-request state threaded through the pipeline as an axum
/// request extension.
///
/// Fields are optional because stages populate them progressively; the
/// panicking accessors are for stages whose predecessor is *required* to
/// have run.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub route: Option<MatchedRoute>,
    pub authentication: Option<Authentication>,
    pub user: Option<GatewayUser>,
    pub target: Option<ResolvedTarget>,
}

impl RequestContext {
    /// The matched route; panics when the route-matching stage did not run.
    pub fn route(&self) -> &MatchedRoute {
        self.route
            .as_ref()
            .expect("no matched route in request context; route matching stage did not run")
    }

    /// The resolved target; panics when the target-resolution stage did not
    /// run.
    pub fn target(&self) -> &ResolvedTarget {
        self.target
            .as_ref()
            .expect("no resolved target in request context; target resolution stage did not run")
    }
}
