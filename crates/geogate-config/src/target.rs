//! Per-destination resolution of access rules and header policy.

use crate::access_rules::AccessRule;
use crate::gateway::GatewayConfig;
use crate::headers::HeaderPolicy;

/// Effective configuration for one request's matched destination, computed
/// by merging the global defaults with the destination's overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Ordered access rules; the first rule matching the request path
    /// decides.
    pub access_rules: Vec<AccessRule>,
    pub headers: HeaderPolicy,
}

impl ResolvedTarget {
    /// First access rule matching the request path, in rule order.
    pub fn matching_rule(&self, path: &str) -> Option<&AccessRule> {
        self.access_rules.iter().find(|r| r.matches(path))
    }
}

impl GatewayConfig {
    /// Resolve the effective access rules and header policy for the route's
    /// destination URI.
    ///
    /// Access rules: the destination's list if non-empty, else the global
    /// list (replace, never merge). Header policy: the global policy with
    /// the destination's present fields overriding field by field.
    pub fn resolve_target(&self, target: &str) -> ResolvedTarget {
        let service = self.find_service(target);

        let access_rules = service
            .filter(|s| !s.access_rules.is_empty())
            .map(|s| s.access_rules.clone())
            .unwrap_or_else(|| self.global_access_rules.clone());

        let headers = service
            .and_then(|s| s.headers.as_ref())
            .map(|overrides| self.default_headers.merge(overrides))
            .unwrap_or_else(|| self.default_headers.clone());

        ResolvedTarget {
            access_rules,
            headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ServiceTarget;

    fn base_config() -> GatewayConfig {
        GatewayConfig {
            global_access_rules: vec![AccessRule {
                intercept_url: vec!["/**".into()],
                anonymous: true,
                allowed_roles: vec![],
            }],
            default_headers: HeaderPolicy {
                proxy: Some(true),
                username: Some(true),
                roles: Some(true),
                org: Some(true),
                ..HeaderPolicy::default()
            },
            services: vec![
                ServiceTarget {
                    name: "open".into(),
                    target: "http://open:8080/app".into(),
                    ..ServiceTarget::default()
                },
                ServiceTarget {
                    name: "restricted".into(),
                    target: "http://restricted:8080/app".into(),
                    access_rules: vec![AccessRule {
                        intercept_url: vec!["/**".into()],
                        anonymous: false,
                        allowed_roles: vec!["ADMINISTRATOR".into()],
                    }],
                    headers: Some(HeaderPolicy {
                        proxy: Some(false),
                        ..HeaderPolicy::default()
                    }),
                },
            ],
            ..GatewayConfig::default()
        }
    }

    #[test]
    fn test_empty_service_rules_fall_back_to_global() {
        let config = base_config();
        let target = config.resolve_target("http://open:8080/app");
        assert_eq!(target.access_rules, config.global_access_rules);
    }

    #[test]
    fn test_service_rules_replace_global() {
        let config = base_config();
        let target = config.resolve_target("http://restricted:8080/app");
        assert_eq!(target.access_rules.len(), 1);
        assert_eq!(target.access_rules[0].allowed_roles, vec!["ADMINISTRATOR"]);
    }

    #[test]
    fn test_unknown_target_uses_global_defaults() {
        let config = base_config();
        let target = config.resolve_target("http://nowhere:1/x");
        assert_eq!(target.access_rules, config.global_access_rules);
        assert_eq!(target.headers, config.default_headers);
    }

    #[test]
    fn test_header_override_is_field_by_field() {
        let config = base_config();
        let target = config.resolve_target("http://restricted:8080/app");
        assert!(!target.headers.proxy_enabled(), "overridden field");
        assert!(target.headers.username_enabled(), "inherited field");
        assert!(target.headers.roles_enabled(), "inherited field");
        assert!(target.headers.org_enabled(), "inherited field");
    }

    #[test]
    fn test_matching_rule_first_wins() {
        let target = ResolvedTarget {
            access_rules: vec![
                AccessRule {
                    intercept_url: vec!["/admin/**".into()],
                    anonymous: false,
                    allowed_roles: vec!["ADMINISTRATOR".into()],
                },
                AccessRule {
                    intercept_url: vec!["/**".into()],
                    anonymous: true,
                    allowed_roles: vec![],
                },
            ],
            headers: HeaderPolicy::default(),
        };
        assert_eq!(
            target.matching_rule("/admin/console").unwrap().allowed_roles,
            vec!["ADMINISTRATOR"]
        );
        assert!(target.matching_rule("/public").unwrap().anonymous);
    }
}
