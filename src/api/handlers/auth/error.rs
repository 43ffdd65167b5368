//! The failure taxonomy for the auth flows.
//!
//! Every collaborator failure (store, hasher) is converted into one of
//! these kinds at the handler boundary; raw errors are logged but never
//! reach a response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;
use tracing::error;

use super::types::ErrorResponse;

/// Credential-failure message shared by unknown-username and
/// wrong-password, so the two cases cannot be told apart.
pub(super) const AUTH_FAILED_MESSAGE: &str = "You shall not pass!";

#[derive(Debug)]
pub enum AuthError {
    /// A required credential field was empty; carries the field name.
    InvalidInput(&'static str),
    /// The username is already registered.
    Conflict(String),
    /// Unknown username or wrong password, indistinguishable on purpose.
    AuthFailed,
    /// The session already carries an identity.
    AlreadyAuthenticated(String),
    /// Logout without an authenticated session.
    NotAuthenticated,
    /// The user listing is empty.
    NoUsers,
    /// Any failure from the store or the hasher.
    Internal(anyhow::Error),
}

impl AuthError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::AuthFailed | Self::AlreadyAuthenticated(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Conflict(_) => StatusCode::FORBIDDEN,
            Self::NotAuthenticated => StatusCode::BAD_REQUEST,
            Self::NoUsers => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::InvalidInput(field) => format!("{field} cannot be empty."),
            Self::Conflict(username) => {
                format!("Username {username} already exists. Please register with a new username.")
            }
            Self::AuthFailed => AUTH_FAILED_MESSAGE.to_string(),
            Self::AlreadyAuthenticated(username) => format!(
                "You are already logged in as {username}. Please log out first before logging in again."
            ),
            Self::NotAuthenticated => "You are not logged in.".to_string(),
            Self::NoUsers => {
                "There are no users in the database. You should register a user first.".to_string()
            }
            Self::Internal(_) => "Internal server error.".to_string(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let Self::Internal(err) = &self {
            error!("Internal error: {err:?}");
        }

        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.message(),
        });

        (status, body).into_response()
    }
}
