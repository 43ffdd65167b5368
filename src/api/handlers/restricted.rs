//! Restricted-section echo endpoint.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::auth::{
    types::{ErrorResponse, MessageResponse},
    SessionRecord,
};

// get restricted access
#[utoipa::path(
    get,
    path = "/api/restricted/{section}",
    params(
        ("section" = String, Path, description = "Section name")
    ),
    responses(
        (status = 200, description = "Section granted", body = MessageResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    ),
    tag = "restricted"
)]
pub async fn restricted(
    Path(section): Path<String>,
    Extension(session): Extension<SessionRecord>,
) -> impl IntoResponse {
    // The gate middleware put the session here; reaching this handler
    // means the caller is logged in.
    (
        StatusCode::OK,
        Json(MessageResponse {
            message: format!(
                "You are in {section}. You are allowed to view this because you are logged in as {}.",
                session.username
            ),
        }),
    )
}
