//! Auth module tests for the pure pieces of the flow: validation,
//! error mapping, cookies, and token handling. The flows against a real
//! database live in `tests/integration_server.rs`.

use super::error::{AuthError, AUTH_FAILED_MESSAGE};
use super::session::{
    clear_session_cookie, extract_session_token, session_cookie, SESSION_COOKIE_NAME,
};
use super::state::AuthConfig;
use super::types::Credentials;
use super::utils::{generate_session_token, hash_session_token, validate_credentials};
use anyhow::{Context, Result};
use axum::http::{header::COOKIE, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use serde_json::Value;

fn credentials(username: &str, password: &str) -> Credentials {
    Credentials {
        username: username.to_string(),
        password: password.to_string().into(),
    }
}

async fn response_parts(err: AuthError) -> Result<(StatusCode, Value)> {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .context("failed to read response body")?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[test]
fn validate_rejects_empty_username() {
    let result = validate_credentials(&credentials("", "secret1"));
    assert!(matches!(result, Err(AuthError::InvalidInput("Username"))));
}

#[test]
fn validate_rejects_empty_password() {
    let result = validate_credentials(&credentials("alice", ""));
    assert!(matches!(result, Err(AuthError::InvalidInput("Password"))));
}

#[test]
fn validate_checks_username_first() {
    // Both fields empty reports the username, like the original flow.
    let result = validate_credentials(&credentials("", ""));
    assert!(matches!(result, Err(AuthError::InvalidInput("Username"))));
}

#[test]
fn validate_accepts_filled_credentials() {
    assert!(validate_credentials(&credentials("alice", "secret1")).is_ok());
}

#[tokio::test]
async fn auth_failed_has_one_message_for_both_causes() -> Result<()> {
    // Unknown username and wrong password both produce this value; the
    // bodies must be byte-identical so accounts cannot be probed.
    let (status_unknown, body_unknown) = response_parts(AuthError::AuthFailed).await?;
    let (status_mismatch, body_mismatch) = response_parts(AuthError::AuthFailed).await?;

    assert_eq!(status_unknown, StatusCode::UNAUTHORIZED);
    assert_eq!(status_unknown, status_mismatch);
    assert_eq!(body_unknown, body_mismatch);
    assert_eq!(
        body_unknown
            .get("error")
            .and_then(Value::as_str)
            .context("missing error")?,
        AUTH_FAILED_MESSAGE
    );
    Ok(())
}

#[tokio::test]
async fn error_statuses_match_the_contract() -> Result<()> {
    let cases = [
        (AuthError::InvalidInput("Username"), StatusCode::UNAUTHORIZED),
        (
            AuthError::Conflict("alice".to_string()),
            StatusCode::FORBIDDEN,
        ),
        (AuthError::AuthFailed, StatusCode::UNAUTHORIZED),
        (
            AuthError::AlreadyAuthenticated("alice".to_string()),
            StatusCode::UNAUTHORIZED,
        ),
        (AuthError::NotAuthenticated, StatusCode::BAD_REQUEST),
        (AuthError::NoUsers, StatusCode::NOT_FOUND),
        (
            AuthError::Internal(anyhow::anyhow!("boom")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, expected) in cases {
        let (status, body) = response_parts(err).await?;
        assert_eq!(status, expected);
        assert!(body.get("error").is_some());
    }
    Ok(())
}

#[tokio::test]
async fn internal_errors_never_leak_details() -> Result<()> {
    let (_, body) = response_parts(AuthError::Internal(anyhow::anyhow!(
        "connection refused to 10.0.0.7"
    )))
    .await?;
    let message = body
        .get("error")
        .and_then(Value::as_str)
        .context("missing error")?;
    assert!(!message.contains("10.0.0.7"));
    Ok(())
}

#[test]
fn already_authenticated_names_the_session_user() {
    let err = AuthError::AlreadyAuthenticated("alice".to_string());
    assert_eq!(
        err.to_string(),
        "You are already logged in as alice. Please log out first before logging in again."
    );
}

#[test]
fn session_cookie_carries_token_and_ttl() -> Result<()> {
    let config = AuthConfig::new(60);
    let cookie = session_cookie(&config, "tok123")?;
    let value = cookie.to_str()?;

    assert!(value.starts_with(&format!("{SESSION_COOKIE_NAME}=tok123;")));
    assert!(value.contains("HttpOnly"));
    assert!(value.contains("SameSite=Lax"));
    assert!(value.contains("Max-Age=60"));
    assert!(!value.contains("Secure"));
    Ok(())
}

#[test]
fn session_cookie_secure_flag_is_opt_in() -> Result<()> {
    let config = AuthConfig::new(60).with_cookie_secure(true);
    let cookie = session_cookie(&config, "tok123")?;
    assert!(cookie.to_str()?.ends_with("; Secure"));
    Ok(())
}

#[test]
fn clear_cookie_expires_immediately() -> Result<()> {
    let config = AuthConfig::default();
    let cookie = clear_session_cookie(&config)?;
    let value = cookie.to_str()?;
    assert!(value.starts_with(&format!("{SESSION_COOKIE_NAME}=;")));
    assert!(value.contains("Max-Age=0"));
    Ok(())
}

#[test]
fn extract_token_finds_the_session_cookie() {
    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_static("other=1; portiere_session=tok123; theme=dark"),
    );
    assert_eq!(extract_session_token(&headers), Some("tok123".to_string()));
}

#[test]
fn extract_token_skips_malformed_pairs() {
    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_static("garbage; portiere_session=tok123"),
    );
    assert_eq!(extract_session_token(&headers), Some("tok123".to_string()));
}

#[test]
fn extract_token_without_cookie_is_none() {
    assert_eq!(extract_session_token(&HeaderMap::new()), None);
}

#[test]
fn session_tokens_are_long_and_unique() -> Result<()> {
    let first = generate_session_token()?;
    let second = generate_session_token()?;

    // 32 bytes, base64url without padding.
    assert_eq!(first.len(), 43);
    assert_ne!(first, second);
    Ok(())
}

#[test]
fn token_hash_is_stable_and_binds_to_the_token() {
    let hash = hash_session_token("tok123");
    assert_eq!(hash.len(), 32);
    assert_eq!(hash, hash_session_token("tok123"));
    assert_ne!(hash, hash_session_token("tok124"));
}

#[test]
fn config_defaults_to_twelve_hour_sessions() {
    let config = AuthConfig::default();
    assert_eq!(config.session_ttl_seconds(), 12 * 60 * 60);
    assert!(!config.session_cookie_secure());
}
