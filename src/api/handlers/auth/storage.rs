//! Database helpers for the credential and session stores.

use anyhow::{anyhow, Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::utils::{generate_session_token, hash_session_token, is_unique_violation};

const SCHEMA_STATEMENTS: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS sessions (
        token_hash BYTEA PRIMARY KEY,
        username TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        expires_at TIMESTAMPTZ NOT NULL
    )
    ",
];

/// Outcome when attempting to create a new user record.
#[derive(Debug)]
pub(super) enum RegisterOutcome {
    Created(Uuid),
    Conflict,
}

/// Stored credential fields needed by login.
pub(super) struct UserRow {
    pub(super) password: String,
}

/// Minimal data resolved from a valid session cookie.
///
/// The gate middleware clones this into request extensions for the
/// protected handlers.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub username: String,
}

/// Create the tables on startup when they do not exist yet.
///
/// # Errors
/// Returns an error when a schema statement fails to apply.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("failed to apply schema statement")?;
    }

    Ok(())
}

/// Look up a user's stored hash by username.
pub(super) async fn lookup_user(pool: &PgPool, username: &str) -> Result<Option<UserRow>> {
    let query = "SELECT password FROM users WHERE username = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user")?;

    Ok(row.map(|row| UserRow {
        password: row.get("password"),
    }))
}

/// Insert a new user record with an already-hashed password.
///
/// The UNIQUE constraint on username is the arbiter: a concurrent
/// registration that slipped past the pre-insert lookup still lands here
/// as `Conflict` instead of a second row.
pub(super) async fn insert_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<RegisterOutcome> {
    let query = r"
        INSERT INTO users (username, password)
        VALUES ($1, $2)
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .bind(password_hash)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(RegisterOutcome::Created(row.get("id"))),
        Err(err) if is_unique_violation(&err) => Ok(RegisterOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert user"),
    }
}

/// Create a session row for a logged-in user and return the raw token.
pub(super) async fn insert_session(
    pool: &PgPool,
    username: &str,
    ttl_seconds: i64,
) -> Result<String> {
    let query = r"
        INSERT INTO sessions (token_hash, username, expires_at)
        VALUES ($1, $2, NOW() + ($3 * INTERVAL '1 second'))
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );

    // Token-hash collisions are vanishingly rare; retry a few times anyway
    // instead of surfacing a 500 on one.
    for _ in 0..3 {
        let token = generate_session_token()?;
        let token_hash = hash_session_token(&token);
        let result = sqlx::query(query)
            .bind(token_hash)
            .bind(username)
            .bind(ttl_seconds)
            .execute(pool)
            .instrument(span.clone())
            .await;

        match result {
            Ok(_) => return Ok(token),
            Err(err) if is_unique_violation(&err) => {}
            Err(err) => return Err(err).context("failed to insert session"),
        }
    }

    Err(anyhow!("failed to generate unique session token"))
}

/// Resolve a token hash into the session's username, ignoring expired rows.
pub(super) async fn lookup_session(
    pool: &PgPool,
    token_hash: &[u8],
) -> Result<Option<SessionRecord>> {
    let query = r"
        SELECT username
        FROM sessions
        WHERE token_hash = $1
          AND expires_at > NOW()
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(token_hash)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup session")?;

    Ok(row.map(|row| SessionRecord {
        username: row.get("username"),
    }))
}

/// Destroy a session row. Deleting an already-missing row is fine.
pub(super) async fn delete_session(pool: &PgPool, token_hash: &[u8]) -> Result<()> {
    let query = "DELETE FROM sessions WHERE token_hash = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(token_hash)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete session")?;

    Ok(())
}
