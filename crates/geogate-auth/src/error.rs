//! Error types for identity resolution.

use thiserror::Error;

/// Failure inside the identity pipeline.
///
/// Resolver lookup failures are deliberately *not* represented here: a
/// resolver that cannot produce a user declines ("no match") and the chain
/// moves on. Only customizer failures become errors, because an identity
/// that was resolved but not fully normalized must never reach
/// authorization.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity customizer '{customizer}' failed: {message}")]
    CustomizerFailed {
        customizer: &'static str,
        message: String,
    },
}
