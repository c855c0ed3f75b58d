use crate::{auth::AuthenticatedUser, saasgate::AppState};
use axum::{response::Json, Extension};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// The signed-in user and where to send them to manage their Saasform account.
#[derive(ToSchema, Serialize, Debug)]
pub struct Me {
    user: AuthenticatedUser,
    logout_url: String,
    profile_url: String,
}

#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Claims of the signed-in user", body = Me),
        (status = 302, description = "No valid `__session` cookie, redirect to the Saasform login page")
    ),
    tag = "saasgate"
)]
pub async fn me(
    Extension(user): Extension<AuthenticatedUser>,
    Extension(state): Extension<Arc<AppState>>,
) -> Json<Me> {
    Json(Me {
        user,
        logout_url: state.urls().logout_url().to_string(),
        profile_url: state.urls().profile_url().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::body_string;
    use crate::{
        saasgate::router,
        test_support::{app_state, provider_token},
    };
    use anyhow::Result;
    use axum::{
        body::Body,
        http::{header::COOKIE, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    #[tokio::test]
    async fn returns_claims_and_account_links() -> Result<()> {
        let token = provider_token(&json!({
            "id": 7,
            "account_id": 42,
            "account_name": "Beautiful SaaS",
            "email": "a@b.com",
            "email_verified": true,
            "status": "active",
        }))?;
        let response = router(app_state()?)
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header(COOKIE, format!("__session={token}"))
                    .body(Body::empty())?,
            )
            .await?;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(response).await?)?;
        assert_eq!(
            body,
            json!({
                "user": {
                    "account_id": 42,
                    "email": "a@b.com",
                    "email_verified": true,
                    "status": "active",
                    "user_id": 7,
                    "account_name": "Beautiful SaaS",
                },
                "logout_url": "http://saasform.test/logout",
                "profile_url": "http://saasform.test/user",
            })
        );
        Ok(())
    }
}
