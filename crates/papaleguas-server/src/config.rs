use std::net::SocketAddr;

use anyhow::{Context, Result, bail};

use papaleguas_api::session::{MAX_SESSION_TTL, SessionConfig};

const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub session: SessionConfig,
    pub admin_username: String,
    pub admin_password: String,
    pub seed_timeline: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup so tests need not touch the process env.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = get("PAPALEGUAS_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = get("PAPALEGUAS_PORT")
            .unwrap_or_else(|| "5000".into())
            .parse()
            .context("PAPALEGUAS_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        let ttl_secs: i64 = get("PAPALEGUAS_SESSION_TTL_SECS")
            .unwrap_or_else(|| "3600".into())
            .parse()
            .context("PAPALEGUAS_SESSION_TTL_SECS must be an integer")?;
        if ttl_secs <= 0 || ttl_secs > MAX_SESSION_TTL.whole_seconds() {
            bail!(
                "PAPALEGUAS_SESSION_TTL_SECS must be between 1 and {}",
                MAX_SESSION_TTL.whole_seconds()
            );
        }

        let production = get("PAPALEGUAS_ENV").is_some_and(|v| v == "production");
        let secure_cookie = match get("PAPALEGUAS_COOKIE_SECURE") {
            Some(v) => parse_bool("PAPALEGUAS_COOKIE_SECURE", &v)?,
            None => production,
        };
        let seed_timeline = match get("PAPALEGUAS_SEED") {
            Some(v) => parse_bool("PAPALEGUAS_SEED", &v)?,
            None => true,
        };

        Ok(Self {
            addr,
            session: SessionConfig { ttl: time::Duration::seconds(ttl_secs), secure_cookie },
            admin_username: get("PAPALEGUAS_ADMIN_USERNAME").unwrap_or_else(|| "admin".into()),
            admin_password: get("PAPALEGUAS_ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.into()),
            seed_timeline,
        })
    }

    pub fn uses_default_admin_password(&self) -> bool {
        self.admin_password == DEFAULT_ADMIN_PASSWORD
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{} must be a boolean, got '{}'", key, other),
    }
}
