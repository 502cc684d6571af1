//! Credential-token → identity resolution.
//!
//! The attendance logic never verifies tokens itself: it receives an
//! [`IdentityResolver`] and asks it for a stable identity.

pub mod registry;

use crate::errors::AppResult;
use crate::models::identity::Identity;

pub use registry::TokenRegistry;

/// Claim extracted from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    pub subject: String,
    pub identity: Identity,
}

/// Profile data attached to a claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub identity: Identity,
    pub display_name: String,
}

pub trait IdentityResolver {
    /// Fails with `AppError::InvalidToken` for unknown or expired tokens.
    fn verify(&self, token: &str) -> AppResult<IdentityClaim>;

    fn resolve(&self, claim: &IdentityClaim) -> AppResult<ResolvedIdentity>;
}

/// `verify` followed by `resolve`.
pub fn authenticate(resolver: &dyn IdentityResolver, token: &str) -> AppResult<ResolvedIdentity> {
    let claim = resolver.verify(token)?;
    resolver.resolve(&claim)
}
