//! Runtime configuration, read from the environment (and `.env`) at startup.

use anyhow::Context;

/// Upper bound for `ACCESS_TOKEN_EXPIRE_MINUTES`: one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// `None` means a random key is generated per process.
    pub secret_key: Option<String>,
    pub access_token_expire_minutes: i64,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env_or("DATABASE_URL", "sqlite://chatvault.db"),
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080"),
            secret_key: non_empty("SECRET_KEY"),
            access_token_expire_minutes: token_ttl_minutes(non_empty("ACCESS_TOKEN_EXPIRE_MINUTES"))?,
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            gemini_model: env_or("GEMINI_MODEL", "gemini-1.5-flash"),
            gemini_base_url: env_or("GEMINI_BASE_URL", crate::provider::DEFAULT_BASE_URL),
            log_level: env_or("LOG_LEVEL", "info"),
            log_json: dotenv::var("LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }

    pub fn token_ttl(&self) -> time::Duration {
        time::Duration::minutes(self.access_token_expire_minutes)
    }
}

fn env_or(key: &str, default: &str) -> String {
    dotenv::var(key).unwrap_or_else(|_| default.to_owned())
}

fn non_empty(key: &str) -> Option<String> {
    dotenv::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn token_ttl_minutes(raw: Option<String>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TOKEN_TTL_MINUTES);
    };

    let minutes: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("ACCESS_TOKEN_EXPIRE_MINUTES is not a whole number: {raw:?}"))?;
    anyhow::ensure!(
        (1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes),
        "ACCESS_TOKEN_EXPIRE_MINUTES must be between 1 and {MAX_TOKEN_TTL_MINUTES}, got {minutes}"
    );

    Ok(minutes)
}
