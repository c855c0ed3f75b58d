//! HTTP surface: public and gated routes, request tracing and serving.

use crate::{
    auth::{require_user, AuthGate, Authenticator},
    cli::telemetry::shutdown_tracer,
    saasform::ProviderUrls,
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware::from_fn_with_state,
    routing::get,
    Extension, Router,
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;

pub(crate) mod handlers;
mod openapi;

pub use openapi::{openapi, ApiDoc};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Everything the handlers need, built once at startup and never mutated.
#[derive(Clone, Debug)]
pub struct AppState {
    authenticator: Arc<Authenticator>,
    urls: ProviderUrls,
}

impl AppState {
    #[must_use]
    pub const fn new(authenticator: Arc<Authenticator>, urls: ProviderUrls) -> Self {
        Self {
            authenticator,
            urls,
        }
    }

    #[must_use]
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    #[must_use]
    pub const fn urls(&self) -> &ProviderUrls {
        &self.urls
    }
}

/// Build the application router.
///
/// `/protected` and `/me` sit behind [`require_user`]; everything else is public.
#[must_use]
pub fn router(state: AppState) -> Router {
    let gate = AuthGate::new(Arc::clone(&state.authenticator), state.urls.login_url());

    Router::new()
        .route("/protected", get(handlers::protected::protected))
        .route("/me", get(handlers::me::me))
        .route_layer(from_fn_with_state(gate, require_user))
        .route("/", get(handlers::root::root))
        .route(
            "/health",
            get(handlers::health::health).options(handlers::health::health),
        )
        .route("/openapi.json", get(openapi::openapi_json))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    |_req: &Request<Body>| {
                        HeaderValue::from_str(Ulid::new().to_string().as_str()).ok()
                    },
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(Arc::new(state))),
        )
}

/// Serve on `[::]:{port}` until SIGINT or SIGTERM.
///
/// # Errors
/// Returns an error if the port cannot be bound or the server fails.
pub async fn new(port: u16, state: AppState) -> Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gracefully shutdown");

    shutdown_tracer();

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
