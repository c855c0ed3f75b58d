//! Saasform identity provider endpoints and public key retrieval.

pub mod public_key;

pub use public_key::{load_key, FetchOptions, KeyUnavailable, PublicKey, KEY_ALGORITHM};

use anyhow::{anyhow, Context, Result};
use tracing::debug;
use url::Url;

const PUBLIC_KEY_ENDPOINT: &str = "/api/v1/public-key";
const LOGIN_ENDPOINT: &str = "/login";
const LOGOUT_ENDPOINT: &str = "/logout";
const PROFILE_ENDPOINT: &str = "/user";

/// URLs of the Saasform instance this service trusts.
///
/// Built once at startup from `SAASFORM_SERVER`; the browser-facing URLs may be
/// overridden individually when Saasform is served on a different host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUrls {
    server: String,
    login: String,
    logout: String,
    profile: String,
}

impl ProviderUrls {
    /// Validate the Saasform base URL and derive the default endpoints.
    ///
    /// # Errors
    /// Returns an error if the URL does not parse, has no host, or is not HTTP(S).
    pub fn new(server: &str) -> Result<Self> {
        let url = Url::parse(server).with_context(|| format!("Invalid Saasform URL: {server}"))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}")),
        }

        if url.host().is_none() {
            return Err(anyhow!("Error parsing URL: no host specified"));
        }

        let server = url.as_str().trim_end_matches('/').to_string();

        Ok(Self {
            login: endpoint_url(&server, LOGIN_ENDPOINT),
            logout: endpoint_url(&server, LOGOUT_ENDPOINT),
            profile: endpoint_url(&server, PROFILE_ENDPOINT),
            server,
        })
    }

    #[must_use]
    pub fn with_login_url(mut self, login: Option<String>) -> Self {
        if let Some(login) = login {
            self.login = login;
        }
        self
    }

    #[must_use]
    pub fn with_logout_url(mut self, logout: Option<String>) -> Self {
        if let Some(logout) = logout {
            self.logout = logout;
        }
        self
    }

    #[must_use]
    pub fn with_profile_url(mut self, profile: Option<String>) -> Self {
        if let Some(profile) = profile {
            self.profile = profile;
        }
        self
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    #[must_use]
    pub fn public_key_url(&self) -> String {
        endpoint_url(&self.server, PUBLIC_KEY_ENDPOINT)
    }

    /// Where unauthenticated browsers are sent.
    #[must_use]
    pub fn login_url(&self) -> &str {
        &self.login
    }

    #[must_use]
    pub fn logout_url(&self) -> &str {
        &self.logout
    }

    #[must_use]
    pub fn profile_url(&self) -> &str {
        &self.profile
    }
}

fn endpoint_url(server: &str, endpoint: &str) -> String {
    let endpoint_url = format!("{server}{endpoint}");

    debug!("endpoint URL: {}", endpoint_url);

    endpoint_url
}
