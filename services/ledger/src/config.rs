use anyhow::{anyhow, Context};
use chrono::Duration;
use serde::Deserialize;
use shared::{
    DEFAULT_ACTIVITY_LIMIT, DEFAULT_GAME, DEFAULT_POOL_SIZE, DEFAULT_WINDOW_SECS,
    MAX_ACTIVITY_LIMIT,
};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub ledger: LedgerConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub ssl_mode: SslPolicy,
    pub schema_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    pub default_game: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub window_seconds: i64,
    pub activity_limit: u32,
}

impl DashboardConfig {
    pub fn window(&self) -> Duration {
        Duration::seconds(self.window_seconds)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_seconds: DEFAULT_WINDOW_SECS,
            activity_limit: DEFAULT_ACTIVITY_LIMIT,
        }
    }
}

/// Transport encryption for the database connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SslPolicy {
    /// Plain TCP for loopback hosts, TLS without certificate checks otherwise
    Auto,
    Disable,
    Require,
}

impl FromStr for SslPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(SslPolicy::Auto),
            "disable" => Ok(SslPolicy::Disable),
            "require" => Ok(SslPolicy::Require),
            other => Err(anyhow!("unknown DATABASE_SSL_MODE '{}'", other)),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let activity_limit: u32 = var("DASHBOARD_ACTIVITY_LIMIT", &DEFAULT_ACTIVITY_LIMIT.to_string())
            .parse()
            .context("DASHBOARD_ACTIVITY_LIMIT")?;
        let window_seconds: i64 = var("DASHBOARD_WINDOW_SECONDS", &DEFAULT_WINDOW_SECS.to_string())
            .parse()
            .context("DASHBOARD_WINDOW_SECONDS")?;
        if window_seconds < 0 {
            anyhow::bail!("DASHBOARD_WINDOW_SECONDS must be non-negative");
        }

        Ok(Config {
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL must be set"))?,
                pool_size: var("DATABASE_POOL_SIZE", &DEFAULT_POOL_SIZE.to_string())
                    .parse()
                    .context("DATABASE_POOL_SIZE")?,
                ssl_mode: var("DATABASE_SSL_MODE", "auto").parse()?,
                schema_path: PathBuf::from(var("SCHEMA_PATH", "schema.sql")),
            },
            ledger: LedgerConfig {
                default_game: var("LEDGER_DEFAULT_GAME", DEFAULT_GAME),
            },
            dashboard: DashboardConfig {
                window_seconds,
                activity_limit: activity_limit.min(MAX_ACTIVITY_LIMIT),
            },
        })
    }
}
