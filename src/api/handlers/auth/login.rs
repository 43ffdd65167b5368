//! Login flow: gate on an anonymous session, verify, then mint a session.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    error::AuthError,
    password::verify_password,
    session::{authenticate_session, session_cookie},
    state::AuthConfig,
    storage::{insert_session, lookup_user},
    types::{Credentials, ErrorResponse, WelcomeResponse},
    utils::validate_credentials,
};

// login a user
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = Credentials,
    responses(
        (status = 201, description = "Login successful", body = WelcomeResponse),
        (status = 401, description = "Already logged in, empty field, or failed credentials", body = ErrorResponse),
        (status = 500, description = "Store or hasher failure", body = ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip(pool, config))]
pub async fn login(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    config: Extension<Arc<AuthConfig>>,
    payload: Option<Json<Credentials>>,
) -> Result<impl IntoResponse, AuthError> {
    // One session carries one identity at a time.
    if let Some(session) = authenticate_session(&headers, &pool).await? {
        return Err(AuthError::AlreadyAuthenticated(session.username));
    }

    let credentials = payload.map_or_else(Credentials::default, |Json(payload)| payload);

    validate_credentials(&credentials)?;

    // Unknown username and wrong password fall into the same error so the
    // response cannot be used to probe for accounts.
    let Some(user) = lookup_user(&pool, &credentials.username).await? else {
        return Err(AuthError::AuthFailed);
    };

    let matches = verify_password(
        credentials.password.expose_secret().to_owned(),
        user.password,
    )
    .await?;

    if !matches {
        return Err(AuthError::AuthFailed);
    }

    let token = insert_session(&pool, &credentials.username, config.session_ttl_seconds()).await?;

    let cookie = session_cookie(&config, &token).map_err(|err| {
        AuthError::Internal(anyhow::anyhow!("failed to build session cookie: {err}"))
    })?;
    let mut response_headers = HeaderMap::new();
    response_headers.insert(SET_COOKIE, cookie);

    debug!("Login successful for {}", credentials.username);

    Ok((
        StatusCode::CREATED,
        response_headers,
        Json(WelcomeResponse {
            welcome: credentials.username,
        }),
    ))
}
