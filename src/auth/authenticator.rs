//! Session token verification.
//!
//! Flow: cookie value -> size check -> ES256 signature and `exp` check against
//! the Saasform key -> claims -> [`AuthenticatedUser`]. Every failure collapses
//! to [`AuthResult::Unauthenticated`]; the reason is only logged.

use super::claims::{AuthenticatedUser, Claims};
use crate::saasform::PublicKey;
use jsonwebtoken::{decode, Validation};
use thiserror::Error;
use tracing::{debug, error, instrument};

/// Larger cookies are rejected before any parsing.
pub const MAX_TOKEN_BYTES: usize = 8192;

/// Upper bound for the `exp` clock skew tolerance (one day).
pub const MAX_LEEWAY_SECONDS: u64 = 86_400;

/// Outcome of authenticating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Authenticated(AuthenticatedUser),
    Unauthenticated,
}

impl AuthResult {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub fn into_user(self) -> Option<AuthenticatedUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Unauthenticated => None,
        }
    }
}

/// Why a token was rejected. Logged, never returned to HTTP clients.
#[derive(Debug, Error)]
pub enum TokenInvalid {
    #[error("token exceeds {MAX_TOKEN_BYTES} bytes")]
    TooLarge,
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Verifies `__session` tokens with the key loaded at startup.
///
/// Holds no mutable state; share it behind an `Arc` across request tasks.
#[derive(Debug)]
pub struct Authenticator {
    key: PublicKey,
    validation: Validation,
}

impl Authenticator {
    #[must_use]
    pub fn new(key: PublicKey) -> Self {
        Self::with_leeway(key, 0)
    }

    /// Build an authenticator tolerating `leeway_seconds` of clock skew on `exp`.
    ///
    /// The leeway is capped at [`MAX_LEEWAY_SECONDS`].
    #[must_use]
    pub fn with_leeway(key: PublicKey, leeway_seconds: u64) -> Self {
        // Only the key's algorithm is accepted, whatever the header claims.
        let mut validation = Validation::new(key.algorithm());
        // Saasform issues no audience and `exp` is checked only when present.
        validation.required_spec_claims.clear();
        validation.validate_aud = false;
        validation.validate_exp = true;
        validation.leeway = leeway_seconds.min(MAX_LEEWAY_SECONDS);

        Self { key, validation }
    }

    #[must_use]
    pub const fn public_key(&self) -> &PublicKey {
        &self.key
    }

    /// Verify `token` and decode its claims.
    ///
    /// # Errors
    /// Returns [`TokenInvalid`] for oversized, malformed, expired, wrongly
    /// signed tokens or tokens whose header names another algorithm.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenInvalid> {
        if token.len() > MAX_TOKEN_BYTES {
            return Err(TokenInvalid::TooLarge);
        }

        let token_data = decode::<Claims>(token, self.key.decoding_key(), &self.validation)?;

        Ok(token_data.claims)
    }

    /// Turn an optional cookie value into an authentication result.
    #[instrument(skip_all)]
    pub fn authenticate(&self, cookie: Option<&str>) -> AuthResult {
        let Some(token) = cookie.filter(|token| !token.is_empty()) else {
            debug!("no session cookie");
            return AuthResult::Unauthenticated;
        };

        match self.verify(token) {
            Ok(claims) => {
                let user = AuthenticatedUser::from(claims);
                debug!(account_id = user.account_id, "session token verified");
                AuthResult::Authenticated(user)
            }
            Err(err) => {
                error!(error = %err, "JWT validation failed");
                AuthResult::Unauthenticated
            }
        }
    }
}

/// One-shot authentication without a long-lived [`Authenticator`].
#[must_use]
pub fn authenticate(cookie: Option<&str>, key: &PublicKey) -> AuthResult {
    Authenticator::new(key.clone()).authenticate(cookie)
}
