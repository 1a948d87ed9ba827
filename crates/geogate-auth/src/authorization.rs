//! Role-based authorization.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use geogate_models::{Authentication, GatewayUser, ensure_role_prefix};

use crate::resolvers::UserMapper;

/// Decides whether an authenticated caller holds at least one of a required
/// role set.
///
/// The decision combines the canonical user's roles (when the resolver chain
/// recognizes the authentication) with the raw granted authorities, each
/// minimally prefixed. The raw-authority fallback keeps authorization
/// functional when no resolver matches, while richer directory-derived roles
/// are honored when available.
pub struct RoleAuthorizationManager {
    mapper: Arc<UserMapper>,
    required: HashSet<String>,
}

impl RoleAuthorizationManager {
    /// Build a manager requiring any one of `roles`, accepted with or
    /// without the canonical prefix.
    pub fn has_any_role<I, S>(mapper: Arc<UserMapper>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let required = roles
            .into_iter()
            .map(|r| ensure_role_prefix(r.as_ref()))
            .collect();
        Self { mapper, required }
    }

    /// Full authorization decision, resolving the canonical user through
    /// the mapper.
    pub async fn authorize(&self, auth: Option<&Authentication>) -> bool {
        let Some(auth) = auth else {
            return false;
        };
        if !auth.authenticated {
            return false;
        }

        let user_roles = match self.mapper.resolve(auth).await {
            Ok(Some(user)) => user.roles,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("identity customization failed, denying access: {e}");
                return false;
            }
        };
        self.decide(&user_roles, &auth.authorities)
    }

    /// Decision against an identity the pipeline already resolved, so the
    /// resolver chain is not run a second time per request.
    pub fn authorize_resolved(&self, user: Option<&GatewayUser>, auth: &Authentication) -> bool {
        if !auth.authenticated {
            return false;
        }
        let empty = Vec::new();
        let user_roles = user.map(|u| u.roles.as_slice()).unwrap_or(&empty);
        self.decide(user_roles, &auth.authorities)
    }

    fn decide(&self, user_roles: &[String], authorities: &[String]) -> bool {
        user_roles.iter().any(|r| self.required.contains(r))
            || authorities
                .iter()
                .any(|a| self.required.contains(&ensure_role_prefix(a)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolvers::UserResolver;
    use async_trait::async_trait;

    /// Resolves every authentication to a fixed user, or declines.
    struct FixedResolver(Option<GatewayUser>);

    #[async_trait]
    impl UserResolver for FixedResolver {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn resolve(&self, _auth: &Authentication) -> Option<GatewayUser> {
            self.0.clone()
        }
    }

    fn manager_with_user(roles: &[&str]) -> RoleAuthorizationManager {
        let mut user = GatewayUser::new("gabe");
        user.roles = roles.iter().map(|r| r.to_string()).collect();
        manager(Some(user))
    }

    fn manager(user: Option<GatewayUser>) -> RoleAuthorizationManager {
        let mapper = Arc::new(UserMapper::new(vec![Box::new(FixedResolver(user))], vec![]));
        RoleAuthorizationManager::has_any_role(mapper, ["GDI_ADMIN", "SUPERUSER", "ROLE_ADMIN"])
    }

    fn authentication(authorities: &[&str]) -> Authentication {
        Authentication::new("gabe", authorities.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn test_denies_unauthenticated() {
        let manager = manager_with_user(&["ROLE_GDI_ADMIN"]);
        let auth = authentication(&[]).unauthenticated();
        assert!(!manager.authorize(Some(&auth)).await);
    }

    #[tokio::test]
    async fn test_denies_absent_authentication() {
        let manager = manager_with_user(&["ROLE_GDI_ADMIN"]);
        assert!(!manager.authorize(None).await);
    }

    #[tokio::test]
    async fn test_has_any_role_against_resolved_user() {
        let auth = authentication(&["ROLE_USER"]);

        for role in ["ROLE_GDI_ADMIN", "ROLE_SUPERUSER", "ROLE_ADMIN"] {
            let manager = manager_with_user(&["ROLE_USER", role]);
            assert!(manager.authorize(Some(&auth)).await, "{role} should allow");
        }

        let manager = manager_with_user(&["ROLE_USER"]);
        assert!(!manager.authorize(Some(&auth)).await);
    }

    #[tokio::test]
    async fn test_joins_user_roles_and_raw_authorities() {
        let manager = manager_with_user(&["ROLE_USER"]);
        let auth = authentication(&["ROLE_GDI_ADMIN"]);
        assert!(manager.authorize(Some(&auth)).await);
    }

    #[tokio::test]
    async fn test_denies_when_nothing_resolves_and_no_authorities() {
        let manager = manager(None);
        let auth = authentication(&[]);
        assert!(!manager.authorize(Some(&auth)).await);
    }

    #[tokio::test]
    async fn test_allows_on_raw_authority_when_no_user_resolves() {
        let manager = manager(None);
        let auth = authentication(&["ROLE_GDI_ADMIN"]);
        assert!(manager.authorize(Some(&auth)).await);
    }

    #[tokio::test]
    async fn test_raw_authorities_get_minimal_prefixing() {
        // "GDI_ADMIN" matches required "GDI_ADMIN" after prefixing only;
        // no normalization or uppercasing is applied to raw authorities
        let manager = manager(None);
        assert!(manager.authorize(Some(&authentication(&["GDI_ADMIN"]))).await);
        assert!(!manager.authorize(Some(&authentication(&["gdi_admin"]))).await);
    }

    #[tokio::test]
    async fn test_authorize_resolved_skips_mapper() {
        let manager = manager(None);
        let mut user = GatewayUser::new("gabe");
        user.roles = vec!["ROLE_SUPERUSER".into()];
        let auth = authentication(&[]);

        assert!(manager.authorize_resolved(Some(&user), &auth));
        assert!(!manager.authorize_resolved(None, &auth));
        assert!(!manager.authorize_resolved(Some(&user), &auth.clone().unauthenticated()));
    }
}
