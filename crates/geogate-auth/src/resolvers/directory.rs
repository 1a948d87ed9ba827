//! Directory-bind resolver.
//!
//! Maps a successful bind against a named directory to a canonical user by
//! looking the principal up through an injected [`DirectoryAccounts`]
//! capability. The wire protocol, connection pooling and retry discipline
//! live behind that capability; this resolver only owns the lookup policy:
//! username first, email as fallback, ambiguity and timeouts resolve to
//! "no match".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::time::timeout;
use tracing::warn;

use geogate_models::{Authentication, AuthenticationSource, GatewayUser};

use super::UserResolver;

const SECONDS_PER_DAY: i64 = 60 * 60 * 24;

/// One account record as reported by a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryRecord {
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organization: Option<String>,
    pub roles: Vec<String>,
    /// Seconds until the account password expires, when the directory
    /// imposes an expiry at all.
    pub seconds_to_password_expiry: Option<i64>,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Two records collapsed onto the same lookup key.
    #[error("account lookup for '{0}' matched more than one record")]
    DuplicateAccount(String),

    #[error("directory lookup failed: {0}")]
    Lookup(String),
}

/// Injected capability for account lookups against one directory.
#[async_trait]
pub trait DirectoryAccounts: Send + Sync {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<DirectoryRecord>, DirectoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<DirectoryRecord>, DirectoryError>;
}

/// Resolves [`AuthenticationSource::DirectoryBind`] authentications whose
/// directory name equals this resolver's configured name, so several
/// directories can be registered side by side.
pub struct DirectoryUserResolver {
    directory: String,
    accounts: Arc<dyn DirectoryAccounts>,
    lookup_timeout: Duration,
}

impl DirectoryUserResolver {
    pub fn new(
        directory: impl Into<String>,
        accounts: Arc<dyn DirectoryAccounts>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            directory: directory.into(),
            accounts,
            lookup_timeout,
        }
    }

    async fn lookup(&self, principal: &str) -> Result<Option<DirectoryRecord>, DirectoryError> {
        match self.accounts.find_by_username(principal).await? {
            Some(record) => Ok(Some(record)),
            None => self.accounts.find_by_email(principal).await,
        }
    }

    fn to_user(&self, record: DirectoryRecord) -> GatewayUser {
        let mut user = GatewayUser::new(record.username);
        user.email = record.email;
        user.first_name = record.first_name;
        user.last_name = record.last_name;
        user.organization = record.organization;
        for role in record.roles {
            user.push_role(role);
        }
        if let Some(seconds) = record.seconds_to_password_expiry {
            user.password_expiry_warn = true;
            user.password_expiry_days = Some((seconds.max(0) / SECONDS_PER_DAY) as u32);
        }
        user
    }
}

#[async_trait]
impl UserResolver for DirectoryUserResolver {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn order(&self) -> i32 {
        0
    }

    async fn resolve(&self, auth: &Authentication) -> Option<GatewayUser> {
        let AuthenticationSource::DirectoryBind { directory } = &auth.source else {
            return None;
        };
        if *directory != self.directory {
            return None;
        }

        match timeout(self.lookup_timeout, self.lookup(&auth.principal)).await {
            Ok(Ok(Some(record))) => Some(self.to_user(record)),
            Ok(Ok(None)) => None,
            Ok(Err(e)) => {
                warn!(
                    directory = %self.directory,
                    principal = %auth.principal,
                    "directory lookup failed, treating as unresolved: {e}"
                );
                None
            }
            Err(_) => {
                warn!(
                    directory = %self.directory,
                    principal = %auth.principal,
                    "directory lookup timed out, treating as unresolved"
                );
                None
            }
        }
    }
}
