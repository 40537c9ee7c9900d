//! Pool construction and schema bootstrap
//!
//! The pool is opened once at process start, handed to every store, and
//! closed explicitly at shutdown.

use std::path::Path;
use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{Executor, PgPool};

use crate::config::{DatabaseConfig, SslPolicy};
use crate::errors::{LedgerError, Result};

const LOOPBACK_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

impl SslPolicy {
    /// Resolve against the connection string. `Require` does not verify
    /// the server certificate, which managed Postgres hosts often need.
    pub fn ssl_mode_for(&self, url: &str) -> PgSslMode {
        match self {
            SslPolicy::Disable => PgSslMode::Disable,
            SslPolicy::Require => PgSslMode::Require,
            SslPolicy::Auto if is_loopback(url) => PgSslMode::Disable,
            SslPolicy::Auto => PgSslMode::Require,
        }
    }
}

fn is_loopback(url: &str) -> bool {
    LOOPBACK_HOSTS.iter().any(|host| url.contains(host))
}

pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let ssl_mode = config.ssl_mode.ssl_mode_for(&config.url);
    let options = PgConnectOptions::from_str(&config.url)?.ssl_mode(ssl_mode);

    let pool = PgPoolOptions::new()
        .max_connections(config.pool_size)
        .connect_with(options)
        .await?;

    tracing::info!(
        pool_size = config.pool_size,
        ssl_mode = ?ssl_mode,
        "Database pool connected"
    );
    Ok(pool)
}

/// Apply the schema file. Statements must be idempotent (`IF NOT EXISTS`)
/// since this runs on every start.
pub async fn ensure_schema(pool: &PgPool, path: &Path) -> Result<()> {
    tracing::info!(path = %path.display(), "Ensuring schema");

    let sql = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LedgerError::Bootstrap(format!("{}: {}", path.display(), e)))?;

    pool.execute(sql.as_str())
        .await
        .map_err(|e| LedgerError::Bootstrap(e.to_string()))?;

    tracing::info!("Schema ready");
    Ok(())
}

pub async fn close(pool: PgPool) {
    pool.close().await;
    tracing::info!("Database pool closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_policy_skips_tls_on_loopback() {
        assert!(matches!(
            SslPolicy::Auto.ssl_mode_for("postgres://user@localhost:5432/ledger"),
            PgSslMode::Disable
        ));
        assert!(matches!(
            SslPolicy::Auto.ssl_mode_for("postgres://user@127.0.0.1/ledger"),
            PgSslMode::Disable
        ));
    }

    #[test]
    fn test_auto_policy_requires_tls_elsewhere() {
        assert!(matches!(
            SslPolicy::Auto.ssl_mode_for("postgres://user@db.example.com/ledger"),
            PgSslMode::Require
        ));
    }

    #[test]
    fn test_explicit_policy_wins() {
        assert!(matches!(
            SslPolicy::Require.ssl_mode_for("postgres://localhost/ledger"),
            PgSslMode::Require
        ));
        assert!(matches!(
            SslPolicy::Disable.ssl_mode_for("postgres://db.example.com/ledger"),
            PgSslMode::Disable
        ));
    }

    #[tokio::test]
    async fn test_missing_schema_file_is_bootstrap_error() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/never_connected")
            .unwrap();

        let err = ensure_schema(&pool, Path::new("/nonexistent/schema.sql"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Bootstrap(msg) if msg.contains("/nonexistent/schema.sql")));
    }
}
