//! Test/mock resolver.

use async_trait::async_trait;

use geogate_models::{Authentication, AuthenticationSource, GatewayUser};

use super::UserResolver;

/// Wraps a [`AuthenticationSource::Mock`] principal and its raw authorities
/// into a canonical user verbatim; the customizer chain takes care of
/// prefixing.
///
/// Registered only in test wiring, with an order that beats every
/// production resolver.
pub struct MockUserResolver;

#[async_trait]
impl UserResolver for MockUserResolver {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn order(&self) -> i32 {
        -100
    }

    async fn resolve(&self, auth: &Authentication) -> Option<GatewayUser> {
        if auth.source != AuthenticationSource::Mock {
            return None;
        }
        let mut user = GatewayUser::new(&auth.principal);
        for authority in &auth.authorities {
            user.push_role(authority.clone());
        }
        Some(user)
    }
}
