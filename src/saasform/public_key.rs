//! Fetch and hold the Saasform token signing public key.
//!
//! The key is fetched once before the server starts. There is no refresh: a key
//! rotated on the Saasform side requires restarting this service.

use super::ProviderUrls;
use crate::APP_USER_AGENT;
use jsonwebtoken::{Algorithm, DecodingKey};
use rand::Rng;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::{fmt, time::Duration};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

/// Saasform signs session tokens with ECDSA over P-256 and SHA-256.
pub const KEY_ALGORITHM: Algorithm = Algorithm::ES256;

/// The public key could not be obtained from Saasform.
#[derive(Debug, Error)]
pub enum KeyUnavailable {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{url} - request failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} - {status}")]
    Status { url: String, status: StatusCode },
    #[error("{url} - invalid JSON response: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} - Error parsing JSON response: no message found")]
    MissingMessage { url: String },
    #[error("{url} - message is not an EC public key: {source}")]
    InvalidKey {
        url: String,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

impl KeyUnavailable {
    /// Whether another attempt could succeed.
    fn is_transient(&self) -> bool {
        !matches!(self, Self::Client(_) | Self::InvalidKey { .. })
    }
}

/// Verification key for Saasform session tokens.
#[derive(Clone)]
pub struct PublicKey {
    /// Key material exactly as Saasform served it.
    pem: String,
    algorithm: Algorithm,
    decoding_key: DecodingKey,
}

impl PublicKey {
    /// Parse a PEM encoded EC public key.
    ///
    /// # Errors
    /// Returns an error if `pem` is not a PEM encoded EC public key.
    pub fn from_pem(pem: impl Into<String>) -> Result<Self, jsonwebtoken::errors::Error> {
        let pem = pem.into();
        let decoding_key = DecodingKey::from_ec_pem(pem.as_bytes())?;
        Ok(Self {
            pem,
            algorithm: KEY_ALGORITHM,
            decoding_key,
        })
    }

    #[must_use]
    pub fn as_pem(&self) -> &str {
        &self.pem
    }

    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub(crate) const fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("algorithm", &self.algorithm)
            .field("pem_len", &self.pem.len())
            .finish_non_exhaustive()
    }
}

/// Knobs for the startup fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Total attempts, at least one.
    pub attempts: u32,
    /// Delay before the second attempt; doubles after each failure.
    pub backoff: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            attempts: 3,
            backoff: Duration::from_secs(1),
        }
    }
}

/// Load the public key from `{server}/api/v1/public-key`, retrying transient failures.
///
/// # Errors
/// Returns [`KeyUnavailable`] once all attempts failed or the served key is unusable.
#[instrument(skip_all, fields(url = %urls.public_key_url()))]
pub async fn load_key(
    urls: &ProviderUrls,
    options: &FetchOptions,
) -> Result<PublicKey, KeyUnavailable> {
    let client = Client::builder()
        .user_agent(APP_USER_AGENT)
        .timeout(options.timeout)
        .build()
        .map_err(KeyUnavailable::Client)?;

    let url = urls.public_key_url();
    let attempts = options.attempts.max(1);

    let mut attempt = 1;
    loop {
        match fetch_public_key(&client, &url).await {
            Ok(key) => {
                info!(algorithm = ?key.algorithm(), "Saasform public key loaded");
                return Ok(key);
            }
            Err(err) if attempt < attempts && err.is_transient() => {
                let delay = backoff_delay(options.backoff, attempt);
                warn!(
                    error = %err,
                    attempt,
                    "public key fetch failed, retrying in {} ms",
                    delay.as_millis()
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Single fetch of the public key, no retries.
///
/// # Errors
/// Returns [`KeyUnavailable`] on transport failure, non-2xx status, a body
/// without a `message` string, or key material that is not an EC public key.
pub async fn fetch_public_key(client: &Client, url: &str) -> Result<PublicKey, KeyUnavailable> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| KeyUnavailable::Transport {
            url: url.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(KeyUnavailable::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let json_response: Value = response
        .json()
        .await
        .map_err(|source| KeyUnavailable::Body {
            url: url.to_string(),
            source,
        })?;

    let pem = json_response["message"]
        .as_str()
        .ok_or_else(|| KeyUnavailable::MissingMessage {
            url: url.to_string(),
        })?;

    PublicKey::from_pem(pem).map_err(|source| KeyUnavailable::InvalidKey {
        url: url.to_string(),
        source,
    })
}

fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = rand::thread_rng().gen_range(0.7..0.9);
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
        .mul_f64(factor)
}
