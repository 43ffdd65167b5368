use crate::api;
use crate::api::handlers::auth::AuthConfig;
use crate::cli::actions::Action;
use anyhow::{Context, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            session_ttl,
            cookie_secure,
        } => {
            // Fail early on a DSN the pool would reject later anyway.
            let dsn = Url::parse(&dsn).context("Invalid database connection string")?;

            let config = AuthConfig::new(session_ttl).with_cookie_secure(cookie_secure);

            api::new(port, dsn.to_string(), config).await?;
        }
    }

    Ok(())
}
