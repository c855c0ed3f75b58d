use crate::{
    auth::Authenticator,
    saasform::{self, FetchOptions, ProviderUrls},
    saasgate::{self, AppState},
};
use anyhow::{Context, Result};
use std::{sync::Arc, time::Duration};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub saasform_server: String,
    pub login_url: Option<String>,
    pub logout_url: Option<String>,
    pub profile_url: Option<String>,
    pub key_timeout_seconds: u64,
    pub key_attempts: u32,
    pub leeway_seconds: u64,
}

impl Args {
    /// Provider URLs with any configured overrides applied.
    ///
    /// # Errors
    /// Returns an error if the Saasform server URL is invalid.
    pub fn provider_urls(&self) -> Result<ProviderUrls> {
        Ok(ProviderUrls::new(&self.saasform_server)?
            .with_login_url(self.login_url.clone())
            .with_logout_url(self.logout_url.clone())
            .with_profile_url(self.profile_url.clone()))
    }

    #[must_use]
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.key_timeout_seconds),
            attempts: self.key_attempts.max(1),
            ..FetchOptions::default()
        }
    }
}

/// Execute the server action.
///
/// # Errors
/// Returns an error if the Saasform URL is invalid, the public key cannot be
/// loaded, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let urls = args.provider_urls()?;

    debug!(
        server = urls.server(),
        login_url = urls.login_url(),
        "Saasform endpoints"
    );

    let key = saasform::load_key(&urls, &args.fetch_options())
        .await
        .context("Could not load the Saasform public key")?;

    let authenticator = Arc::new(Authenticator::with_leeway(key, args.leeway_seconds));

    saasgate::new(args.port, AppState::new(authenticator, urls)).await
}
