use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use geogate_auth::customizers::{RolePrefixCustomizer, RolesMappingCustomizer, UserCustomizer};
use geogate_auth::resolvers::{
    DirectoryAccounts, DirectoryUserResolver, OAuth2UserResolver, OidcUserResolver,
    PreauthUserResolver, UserMapper, UserResolver,
};
use geogate_config::GatewayConfig;

use crate::middleware::remove_headers::HeaderFilter;
use crate::proxy::ProxyClient;

/// Shared application state: the immutable configuration snapshot and the
/// identity pipeline built from it.
///
/// Everything here is read-mostly and shared across all in-flight requests;
/// per-request state lives in the request context only.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub mapper: Arc<UserMapper>,
    pub header_filter: Arc<HeaderFilter>,
    pub proxy: ProxyClient,
}

/// Build the application state from a validated configuration snapshot.
///
/// `directories` injects the account-lookup capability for each configured
/// directory source by name; directories configured without a capability
/// are skipped with a warning (their bind authentications then resolve to
/// no canonical user).
pub fn init_app_state(
    config: GatewayConfig,
    directories: HashMap<String, Arc<dyn DirectoryAccounts>>,
) -> anyhow::Result<AppState> {
    let mut resolvers: Vec<Box<dyn UserResolver>> = Vec::new();

    for dir in &config.security.directories {
        match directories.get(&dir.name) {
            Some(accounts) => resolvers.push(Box::new(DirectoryUserResolver::new(
                dir.name.clone(),
                accounts.clone(),
                Duration::from_secs(dir.lookup_timeout_secs),
            ))),
            None => tracing::warn!(
                directory = %dir.name,
                "configured directory has no account lookup wired, skipping"
            ),
        }
    }
    resolvers.push(Box::new(OidcUserResolver::new(config.oidc.roles.clone())));
    resolvers.push(Box::new(OAuth2UserResolver::new(
        config.oauth2.roles.clone(),
    )));
    resolvers.push(Box::new(PreauthUserResolver));

    let customizers: Vec<Box<dyn UserCustomizer>> = vec![
        Box::new(RolesMappingCustomizer::new(config.roles_mappings.clone())),
        Box::new(RolePrefixCustomizer),
    ];

    let header_filter = HeaderFilter::new(&config.security.remove_headers)
        .context("security.remove_headers did not compile")?;

    Ok(AppState {
        config: Arc::new(config),
        mapper: Arc::new(UserMapper::new(resolvers, customizers)),
        header_filter: Arc::new(header_filter),
        proxy: ProxyClient::new()?,
    })
}
