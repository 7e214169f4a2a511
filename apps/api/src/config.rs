use anyhow::{bail, Context, Result};
use chrono::Duration;

use crate::form::validation::MESSAGE_MIN_CHARS;

const MAX_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on the trimmed bio length.
    pub message_char_limit: usize,
    pub max_sessions: usize,
    /// Idle time after which an abandoned form session is dropped.
    pub session_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            message_char_limit: parse_env("MESSAGE_CHAR_LIMIT", 500)?,
            max_sessions: parse_env("MAX_SESSIONS", 1000)?,
            session_ttl_secs: parse_env("SESSION_TTL_SECS", 1800)?,
        };
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.message_char_limit < MESSAGE_MIN_CHARS {
            bail!(
                "MESSAGE_CHAR_LIMIT must be at least {}, got {}",
                MESSAGE_MIN_CHARS,
                self.message_char_limit
            );
        }
        if self.max_sessions == 0 {
            bail!("MAX_SESSIONS must be greater than zero");
        }
        if !(1..=MAX_SESSION_TTL_SECS).contains(&self.session_ttl_secs) {
            bail!(
                "SESSION_TTL_SECS must be between 1 and {}, got {}",
                MAX_SESSION_TTL_SECS,
                self.session_ttl_secs
            );
        }
        Ok(())
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::seconds(self.session_ttl_secs.min(MAX_SESSION_TTL_SECS) as i64)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            message_char_limit: 500,
            max_sessions: 1000,
            session_ttl_secs: 1800,
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
