//! The authentication result handed to the pipeline by the security layer.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Read-only authentication input to the identity resolution pipeline.
///
/// Produced by the upstream security layer (directory bind, OAuth2/OIDC
/// login, trusted pre-authentication headers); this core never creates one
/// from scratch outside of tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Authentication {
    /// Principal name as reported by the authentication mechanism.
    pub principal: String,
    /// Raw granted-authority strings, in grant order.
    pub authorities: Vec<String>,
    pub authenticated: bool,
    pub source: AuthenticationSource,
}

/// Statically registered set of authentication mechanisms.
///
/// Resolvers match on the variant they recognize and decline the rest, so
/// adding a mechanism means adding a variant and a resolver, not touching
/// existing ones.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthenticationSource {
    /// Successful bind against a named directory.
    DirectoryBind { directory: String },
    /// Identity asserted by a trusted upstream proxy via `preauth-*` headers
    /// (lowercased header name -> first value).
    PreAuthenticatedHeaders(HashMap<String, String>),
    /// OAuth2 authorization-code login without an ID token.
    OAuth2 {
        provider: String,
        claims: Map<String, Value>,
    },
    /// OpenID Connect login; `claims` is the validated ID token claim set.
    Oidc {
        provider: String,
        claims: Map<String, Value>,
    },
    /// Test/mock principal.
    Mock,
    /// Mechanism unknown to every resolver; authorization falls back to the
    /// raw authorities.
    Unspecified,
}

impl Authentication {
    pub fn new(principal: impl Into<String>, authorities: Vec<String>) -> Self {
        Self {
            principal: principal.into(),
            authorities,
            authenticated: true,
            source: AuthenticationSource::Unspecified,
        }
    }

    pub fn with_source(mut self, source: AuthenticationSource) -> Self {
        self.source = source;
        self
    }

    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }
}
