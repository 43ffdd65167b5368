//! Request/response types for the auth endpoints.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Credentials as posted to `/api/login` and `/api/register`.
///
/// The password lives in a [`SecretString`] so debug output and request
/// traces redact it; it only leaves the wrapper to be hashed or verified.
/// Missing fields deserialize to empty strings and are rejected by
/// validation, matching the empty-field checks on both flows.
#[derive(ToSchema, Deserialize, Default, Debug)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    #[schema(value_type = String, default = "")]
    pub password: SecretString,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct WelcomeResponse {
    pub welcome: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
