#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Public landing page", body = String, content_type = "text/plain")
    ),
    tag = "saasgate"
)]
pub async fn root() -> &'static str {
    "Hello, World!"
}
