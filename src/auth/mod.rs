//! Stateless authentication against Saasform session tokens.

pub mod authenticator;
pub mod claims;
pub mod cookie;
pub mod gate;

pub use authenticator::{
    authenticate, AuthResult, Authenticator, TokenInvalid, MAX_LEEWAY_SECONDS, MAX_TOKEN_BYTES,
};
pub use claims::{AuthenticatedUser, ClaimFlag, Claims};
pub use cookie::{extract_session_cookie, SESSION_COOKIE_NAME};
pub use gate::{require_user, AuthGate};
