//! Registration flow: validate, check availability, hash, insert.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::PgPool;
use tracing::{debug, instrument};

use super::{
    error::AuthError,
    password::hash_password,
    storage::{insert_user, lookup_user, RegisterOutcome},
    types::{Credentials, ErrorResponse},
    utils::validate_credentials,
};

// register a new user
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = Credentials,
    responses(
        (status = 201, description = "User created; the body is the new record's id", body = String),
        (status = 401, description = "Empty username or password", body = ErrorResponse),
        (status = 403, description = "Username already exists", body = ErrorResponse),
        (status = 500, description = "Hashing or store failure", body = ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip(pool))]
pub async fn register(
    pool: Extension<PgPool>,
    payload: Option<Json<Credentials>>,
) -> Result<impl IntoResponse, AuthError> {
    let credentials = payload.map_or_else(Credentials::default, |Json(payload)| payload);

    validate_credentials(&credentials)?;

    // The lookup gives the cheap 403 up front; the UNIQUE constraint in
    // insert_user still decides under concurrent registration.
    if lookup_user(&pool, &credentials.username).await?.is_some() {
        return Err(AuthError::Conflict(credentials.username));
    }

    let password_hash = hash_password(credentials.password.expose_secret().to_owned()).await?;

    match insert_user(&pool, &credentials.username, &password_hash).await? {
        RegisterOutcome::Created(id) => {
            debug!("Registered user {}", credentials.username);

            // Registering does not log the user in; no session is created.
            Ok((StatusCode::CREATED, Json(json!(id.to_string()))))
        }
        RegisterOutcome::Conflict => Err(AuthError::Conflict(credentials.username)),
    }
}
