//! Claims carried by a Saasform session token and the user built from them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payload of a verified `__session` token.
///
/// Saasform issues `{nonce, id, account_id, account_name, status, email,
/// email_verified, staff}`; everything is optional here and unknown fields
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub account_id: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<ClaimFlag>,
    #[serde(default)]
    pub status: Option<String>,
    /// Saasform user id, distinct from the account id.
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub staff: Option<bool>,
    /// Expiry as a NumericDate; any other JSON type fails decoding.
    #[serde(default)]
    pub exp: Option<u64>,
}

/// A flag Saasform has emitted both as a JSON boolean and as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ClaimFlag {
    Bool(bool),
    Text(String),
}

impl ClaimFlag {
    /// `true` only for `true` or the string `"true"` (any case).
    #[must_use]
    pub fn is_true(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Text(value) => value.eq_ignore_ascii_case("true"),
        }
    }
}

/// Identity of the caller for the duration of one request.
///
/// `account_id` is the uniqueness key. Optional claims stay optional: a
/// missing `email_verified` is never turned into a verified state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthenticatedUser {
    pub account_id: u64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<ClaimFlag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<bool>,
}

impl AuthenticatedUser {
    /// Uniqueness key for this user.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.account_id
    }

    #[must_use]
    pub fn email_verified(&self) -> bool {
        self.email_verified.as_ref().is_some_and(ClaimFlag::is_true)
    }
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            account_id: claims.account_id.unwrap_or(0),
            email: claims.email.unwrap_or_default(),
            email_verified: claims.email_verified,
            status: claims.status,
            user_id: claims.id,
            account_name: claims.account_name,
            staff: claims.staff,
        }
    }
}
