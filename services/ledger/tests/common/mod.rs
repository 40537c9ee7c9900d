//! Common test utilities and fixtures for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use ledger::config::Config;
use ledger::domain::{NewBet, RecordBetRequest, WireInteger};
use ledger::repository::{InMemoryLedgerStore, InMemoryRulesStore};
use ledger::Ledger;
use shared::LamportAmount;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::{Mutex, MutexGuard};

pub fn test_config(database_url: &str) -> Config {
    let url = database_url.to_string();
    Config::from_lookup(move |key| match key {
        "DATABASE_URL" => Some(url.clone()),
        "DATABASE_SSL_MODE" => Some("disable".to_string()),
        _ => None,
    })
    .expect("Failed to build test config")
}

/// Ledger over in-memory stores, plus handles for seeding them directly.
pub struct MemoryContext {
    pub ledger: Ledger,
    pub store: Arc<InMemoryLedgerStore>,
    pub rules: Arc<InMemoryRulesStore>,
}

impl MemoryContext {
    pub fn new() -> Self {
        let config = test_config("postgres://localhost/unused");
        let store = Arc::new(InMemoryLedgerStore::new(config.ledger.default_game.clone()));
        let rules = Arc::new(InMemoryRulesStore::new());
        let ledger = Ledger::new(config, store.clone(), rules.clone());
        Self { ledger, store, rules }
    }
}

pub fn record_request(player: &str, nonce: u64, amount: u64) -> RecordBetRequest {
    RecordBetRequest {
        player: player.to_string(),
        amount: WireInteger::from(amount),
        bet_type: 0,
        target: 50,
        nonce: WireInteger::from(nonce),
        expiry: WireInteger::from(1_900_000_000u64),
        signature_ref: Some("3yZe7d".to_string()),
        game: None,
    }
}

pub fn new_bet(player: &str, nonce: u64, amount: u64) -> NewBet {
    NewBet {
        player: player.to_string(),
        amount: LamportAmount::new(amount),
        bet_type: 0,
        target: 50,
        nonce,
        expiry: 1_900_000_000,
        signature_ref: String::new(),
        status: None,
        game: None,
    }
}

// Aggregates span the whole table, so Postgres tests take turns.
static PG_SERIAL: Mutex<()> = Mutex::const_new(());

/// Postgres-backed context. Tests using it are `#[ignore]`d and need a
/// reachable database in DATABASE_URL.
pub struct PgContext {
    pub pool: PgPool,
    pub ledger: Ledger,
    _serial: MutexGuard<'static, ()>,
}

impl PgContext {
    pub async fn new() -> Self {
        let serial = PG_SERIAL.lock().await;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/wager_ledger_test".to_string());

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        let schema = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("schema.sql");
        ledger::db::ensure_schema(&pool, &schema)
            .await
            .expect("Failed to apply schema");

        let ledger = Ledger::postgres(test_config(&database_url), pool.clone());
        Self {
            pool,
            ledger,
            _serial: serial,
        }
    }

    /// Nonce not used by any earlier run against the same database.
    pub fn unique_nonce(&self) -> u64 {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        // Above 2^53 on purpose: exercises the exact NUMERIC path
        (1u64 << 60) + nanos as u64
    }

    pub async fn cleanup_nonce(&self, nonce: u64) {
        sqlx::query("DELETE FROM bets WHERE nonce = $1::NUMERIC")
            .bind(nonce.to_string())
            .execute(&self.pool)
            .await
            .expect("Failed to cleanup");
    }

    /// Move a bet's creation time into the past.
    pub async fn backdate(&self, id: i64, hours: i64) {
        sqlx::query("UPDATE bets SET created_at = NOW() - ($2::BIGINT * INTERVAL '1 hour') WHERE id = $1")
            .bind(id)
            .bind(hours)
            .execute(&self.pool)
            .await
            .expect("Failed to backdate bet");
    }
}
