//! Session configuration shared by the auth handlers.

const DEFAULT_SESSION_TTL_SECONDS: i64 = 12 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    session_ttl_seconds: i64,
    session_cookie_secure: bool,
}

impl AuthConfig {
    #[must_use]
    pub const fn new(session_ttl_seconds: i64) -> Self {
        Self {
            session_ttl_seconds,
            session_cookie_secure: false,
        }
    }

    /// Only mark cookies secure when the service is served over HTTPS.
    #[must_use]
    pub const fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.session_cookie_secure = secure;
        self
    }

    #[must_use]
    pub const fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub const fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL_SECONDS)
    }
}
