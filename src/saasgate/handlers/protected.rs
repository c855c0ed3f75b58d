use crate::auth::AuthenticatedUser;
use axum::Extension;
use tracing::debug;

#[utoipa::path(
    get,
    path = "/protected",
    responses(
        (status = 200, description = "Greeting for the signed-in user", body = String, content_type = "text/plain"),
        (status = 302, description = "No valid `__session` cookie, redirect to the Saasform login page")
    ),
    tag = "saasgate"
)]
pub async fn protected(Extension(user): Extension<AuthenticatedUser>) -> String {
    debug!(account_id = user.account_id, "protected page");
    format!("Hello, {}", user.email)
}
