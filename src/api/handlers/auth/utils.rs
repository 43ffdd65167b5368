//! Small helpers for credential validation and session token handling.

use anyhow::{Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};

use super::error::AuthError;
use super::types::Credentials;

/// Reject credentials with an empty field before any store work happens.
pub(super) fn validate_credentials(credentials: &Credentials) -> Result<(), AuthError> {
    if credentials.username.is_empty() {
        return Err(AuthError::InvalidInput("Username"));
    }

    if credentials.password.expose_secret().is_empty() {
        return Err(AuthError::InvalidInput("Password"));
    }

    Ok(())
}

/// Create a new session token for the auth cookie.
/// The raw value is only returned to set the cookie; the database stores a hash.
pub(super) fn generate_session_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

/// Hash a session token so raw values never touch the database.
/// The hash is used for lookups when the cookie is presented.
pub(super) fn hash_session_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
