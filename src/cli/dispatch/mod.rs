use crate::cli::actions::Action;
use anyhow::Result;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        dsn: matches
            .get_one("dsn")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --dsn"))?,
        session_ttl: matches
            .get_one::<i64>("session-ttl")
            .copied()
            .unwrap_or(43_200),
        cookie_secure: matches.get_flag("cookie-secure"),
    })
}
