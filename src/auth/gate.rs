//! Access-control gate for protected routes.
//!
//! Reads `__session`, authenticates it, and either stores the
//! [`AuthenticatedUser`](super::AuthenticatedUser) in the request extensions or
//! redirects the browser to the Saasform login page.

use super::{cookie::extract_session_cookie, AuthResult, Authenticator};
use axum::{
    extract::{Request, State},
    http::{header::LOCATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// State for [`require_user`].
#[derive(Clone, Debug)]
pub struct AuthGate {
    authenticator: Arc<Authenticator>,
    login_url: Arc<str>,
}

impl AuthGate {
    #[must_use]
    pub fn new(authenticator: Arc<Authenticator>, login_url: &str) -> Self {
        Self {
            authenticator,
            login_url: Arc::from(login_url),
        }
    }

    #[must_use]
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    #[must_use]
    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// `302 Found` to the login page.
    fn redirect_to_login(&self) -> Response {
        match HeaderValue::from_str(&self.login_url) {
            Ok(location) => (StatusCode::FOUND, [(LOCATION, location)]).into_response(),
            Err(err) => {
                error!("Failed to build login redirect: {err}");
                StatusCode::UNAUTHORIZED.into_response()
            }
        }
    }
}

/// Middleware guarding a route with the Saasform session.
///
/// Unauthenticated requests never reach the handler; the response is the same
/// redirect whatever made the token invalid.
#[instrument(skip_all, name = "auth.gate")]
pub async fn require_user(State(gate): State<AuthGate>, mut req: Request, next: Next) -> Response {
    let cookie = extract_session_cookie(req.headers());

    match gate.authenticator().authenticate(cookie.as_deref()) {
        AuthResult::Authenticated(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        AuthResult::Unauthenticated => {
            debug!(login_url = gate.login_url(), "redirecting to login");
            gate.redirect_to_login()
        }
    }
}
