//! User listing, behind the session gate.

use anyhow::Context;
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use sqlx::{PgPool, Row};
use tracing::Instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use super::auth::{types::ErrorResponse, AuthError};

/// Listing entry; the stored password hash never leaves the store.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

// get all the users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All registered users", body = [UserSummary]),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "No users registered yet", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn users(pool: Extension<PgPool>) -> Result<impl IntoResponse, AuthError> {
    let list = fetch_user_summaries(&pool).await?;

    // An empty store is reported, not returned as an empty success.
    if list.is_empty() {
        return Err(AuthError::NoUsers);
    }

    Ok((StatusCode::OK, Json(list)))
}

async fn fetch_user_summaries(pool: &PgPool) -> anyhow::Result<Vec<UserSummary>> {
    let query = "SELECT id, username FROM users ORDER BY created_at";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list users")?;

    Ok(rows
        .iter()
        .map(|row| UserSummary {
            id: row.get::<Uuid, _>("id").to_string(),
            username: row.get("username"),
        })
        .collect())
}
