//! The identity resolver chain.
//!
//! Resolvers convert an opaque [`Authentication`] into a canonical
//! [`GatewayUser`], or decline. They are registered statically in a
//! [`UserMapper`], sorted once at construction by declared order (ties keep
//! registration order), and tried in ascending order; the first resolver
//! returning a user wins.

pub mod directory;
pub mod mock;
pub mod oauth2;
pub mod preauth;

use async_trait::async_trait;

use geogate_models::{Authentication, GatewayUser};

use crate::customizers::UserCustomizer;
use crate::error::AuthError;

pub use directory::{DirectoryAccounts, DirectoryError, DirectoryRecord, DirectoryUserResolver};
pub use mock::MockUserResolver;
pub use oauth2::{OAuth2UserResolver, OidcUserResolver};
pub use preauth::PreauthUserResolver;

/// Converts an authentication result into a canonical user, or declines.
///
/// A resolver must tolerate every [`Authentication`] shape and return `None`
/// for the ones it does not recognize; runtime lookup failures are also
/// `None`, never an error, so authorization can fall back to the raw
/// granted authorities.
#[async_trait]
pub trait UserResolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Chain position; lower runs earlier, ties keep registration order.
    fn order(&self) -> i32 {
        0
    }

    async fn resolve(&self, auth: &Authentication) -> Option<GatewayUser>;
}

/// The ordered resolver and customizer chains, shared by the identity
/// resolution stage and the authorization manager.
pub struct UserMapper {
    resolvers: Vec<Box<dyn UserResolver>>,
    customizers: Vec<Box<dyn UserCustomizer>>,
}

impl UserMapper {
    pub fn new(
        mut resolvers: Vec<Box<dyn UserResolver>>,
        mut customizers: Vec<Box<dyn UserCustomizer>>,
    ) -> Self {
        // stable sorts: equal orders keep registration order
        resolvers.sort_by_key(|r| r.order());
        customizers.sort_by_key(|c| c.order());
        Self {
            resolvers,
            customizers,
        }
    }

    /// Resolve the canonical user for `auth`, running every customizer on a
    /// successful resolution.
    ///
    /// `Ok(None)` means no resolver recognized the authentication; an error
    /// means a customizer failed and the identity must not be used.
    pub async fn resolve(&self, auth: &Authentication) -> Result<Option<GatewayUser>, AuthError> {
        for resolver in &self.resolvers {
            if let Some(user) = resolver.resolve(auth).await {
                tracing::debug!(
                    resolver = resolver.name(),
                    username = %user.username,
                    "resolved canonical user"
                );
                return self.customize(auth, user).map(Some);
            }
        }
        Ok(None)
    }

    fn customize(
        &self,
        auth: &Authentication,
        mut user: GatewayUser,
    ) -> Result<GatewayUser, AuthError> {
        for customizer in &self.customizers {
            user = customizer.customize(auth, user)?;
        }
        Ok(user)
    }
}
