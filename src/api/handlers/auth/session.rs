//! Session cookie handling, the access gate, and the session endpoints.

use anyhow::Result;
use axum::{
    extract::{Extension, Request},
    http::{
        header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::{
    error::AuthError,
    state::AuthConfig,
    storage::{delete_session, lookup_session, SessionRecord},
    types::{ErrorResponse, MessageResponse},
    utils::hash_session_token,
};

pub(super) const SESSION_COOKIE_NAME: &str = "portiere_session";

// check if a user is logged in during this session
#[utoipa::path(
    get,
    path = "/api/checklogin",
    responses(
        (status = 200, description = "The session's username, or `false` when anonymous", body = String)
    ),
    tag = "auth"
)]
pub async fn checklogin(headers: HeaderMap, pool: Extension<PgPool>) -> impl IntoResponse {
    // Never fails: a store error degrades to an anonymous answer.
    match authenticate_session(&headers, &pool).await {
        Ok(Some(session)) => (StatusCode::OK, Json(json!(session.username))),
        Ok(None) => (StatusCode::OK, Json(json!(false))),
        Err(err) => {
            error!("Failed to resolve session: {err:?}");
            (StatusCode::OK, Json(json!(false)))
        }
    }
}

// logout a user
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Session destroyed", body = MessageResponse),
        (status = 400, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Failed to destroy the session", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    config: Extension<Arc<AuthConfig>>,
) -> Result<impl IntoResponse, AuthError> {
    let token = extract_session_token(&headers).ok_or(AuthError::NotAuthenticated)?;
    let token_hash = hash_session_token(&token);

    // A cookie pointing at a destroyed or expired row is still anonymous.
    if lookup_session(&pool, &token_hash).await?.is_none() {
        return Err(AuthError::NotAuthenticated);
    }

    delete_session(&pool, &token_hash).await?;

    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(&config) {
        response_headers.insert(SET_COOKIE, cookie);
    }

    Ok((
        StatusCode::OK,
        response_headers,
        Json(MessageResponse {
            message: "Successfully logged out.".to_string(),
        }),
    ))
}

/// Access gate for the protected endpoints.
///
/// Applied as a `route_layer`: it resolves the cookie once, injects the
/// session record for the handler, and denies before the handler runs
/// otherwise.
pub async fn require_session(
    Extension(pool): Extension<PgPool>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match authenticate_session(request.headers(), &pool).await {
        Ok(Some(session)) => session,
        Ok(None) => return AuthError::AuthFailed.into_response(),
        Err(err) => return AuthError::Internal(err).into_response(),
    };

    request.extensions_mut().insert(session);
    next.run(request).await
}

/// Resolve a session cookie into a session record, if present.
///
/// Returns `Ok(None)` when the cookie is missing or stale.
pub(super) async fn authenticate_session(
    headers: &HeaderMap,
    pool: &PgPool,
) -> Result<Option<SessionRecord>> {
    let Some(token) = extract_session_token(headers) else {
        return Ok(None);
    };
    // Only the hash is stored; never compare raw tokens against the database.
    let token_hash = hash_session_token(&token);
    lookup_session(pool, &token_hash).await
}

/// Build a secure `HttpOnly` cookie for the session token.
pub(super) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(super) fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub(super) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
            continue;
        };
        if key.trim() == SESSION_COOKIE_NAME {
            return Some(val.trim().to_string());
        }
    }
    None
}
