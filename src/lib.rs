//! # saasgate (Saasform single sign-on gate)
//!
//! `saasgate` serves a small HTTP application whose protected routes trust the
//! Saasform identity provider. Saasform signs users in on its own domain and
//! drops an ES256-signed JWT into the `__session` cookie; `saasgate` verifies
//! that cookie on every protected request without keeping any session state.
//!
//! ## Startup
//!
//! The provider's public key is fetched once from
//! `{SAASFORM_SERVER}/api/v1/public-key` before the listener is bound. If the
//! key cannot be obtained the process exits: protected routes are never served
//! without a verification key, and the key is never refreshed afterwards.
//!
//! ## Per request
//!
//! The gate reads `__session`, verifies it with ES256 only (the token header
//! never selects the algorithm), and either attaches an [`auth::AuthenticatedUser`]
//! to the request or redirects the browser to the provider's login page.

pub mod auth;
pub mod cli;
pub mod saasform;
pub mod saasgate;

#[cfg(test)]
pub(crate) mod test_support;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
