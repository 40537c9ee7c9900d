use async_trait::async_trait;
use chrono::Duration;
use shared::LamportAmount;
use sqlx::PgPool;

use super::rows::{parse_aggregate, BetRow, BET_COLUMNS};
use super::status::status_to_str;
use crate::domain::{Bet, BetStatus, NewBet};
use crate::errors::Result;

/// Storage primitives for the `bets` table.
///
/// Every write is a single atomic statement. Coordination between
/// concurrent writers relies on conditional updates and "latest row wins"
/// reads, never on locks held by the caller.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Append a bet. Missing status defaults to `prepared_lock`, missing
    /// game to the store's default game.
    async fn insert(&self, bet: NewBet) -> Result<Bet>;

    /// Most recently created bet with this nonce.
    async fn find_latest_by_nonce(&self, nonce: u64) -> Result<Option<Bet>>;

    /// Record roll and payout on the latest bet for `nonce` if it is still
    /// `prepared_lock`. Returns the number of rows changed (0 or 1).
    async fn apply_resolution(&self, nonce: u64, roll: i32, payout: LamportAmount) -> Result<u64>;

    async fn count_distinct_players(&self) -> Result<u64>;

    /// Bets created strictly after `now - window`.
    async fn count_created_since(&self, window: Duration) -> Result<u64>;

    async fn sum_amount(&self) -> Result<u128>;

    /// Sum of `amount - payout` over bets created strictly after `now - window`.
    async fn sum_net_since(&self, window: Duration) -> Result<i128>;

    /// The `limit` most recently created bets, newest first.
    async fn latest(&self, limit: u32) -> Result<Vec<Bet>>;
}

pub struct PgLedgerStore {
    pool: PgPool,
    default_game: String,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool, default_game: impl Into<String>) -> Self {
        Self {
            pool,
            default_game: default_game.into(),
        }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn insert(&self, bet: NewBet) -> Result<Bet> {
        let sql = format!(
            r#"
            INSERT INTO bets (
                player, bet_amount_lamports, bet_type, target, roll,
                payout_lamports, nonce, expiry_unix, signature_base58, status, game
            )
            VALUES ($1, $2::NUMERIC, $3, $4, 0, 0, $5::NUMERIC, $6::NUMERIC, $7, $8, $9)
            RETURNING {BET_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, BetRow>(&sql)
            .bind(&bet.player)
            .bind(bet.amount.as_u64().to_string())
            .bind(bet.bet_type)
            .bind(bet.target)
            .bind(bet.nonce.to_string())
            .bind(bet.expiry.to_string())
            .bind(&bet.signature_ref)
            .bind(status_to_str(bet.status_or_default()))
            .bind(bet.game_or(&self.default_game))
            .fetch_one(&self.pool)
            .await?;

        Bet::try_from(row)
    }

    async fn find_latest_by_nonce(&self, nonce: u64) -> Result<Option<Bet>> {
        let sql = format!(
            r#"
            SELECT {BET_COLUMNS}
            FROM bets
            WHERE nonce = $1::NUMERIC
            ORDER BY id DESC
            LIMIT 1
            "#
        );

        sqlx::query_as::<_, BetRow>(&sql)
            .bind(nonce.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(Bet::try_from)
            .transpose()
    }

    async fn apply_resolution(&self, nonce: u64, roll: i32, payout: LamportAmount) -> Result<u64> {
        // Targets only the newest row for the nonce, and only while it is
        // still locked. A concurrent second attempt re-evaluates the status
        // predicate after the first commits and matches nothing.
        let sources: Vec<String> = BetStatus::sources_of(BetStatus::RESOLVED)
            .into_iter()
            .map(|status| status_to_str(status).to_string())
            .collect();

        let result = sqlx::query(
            r#"
            UPDATE bets
            SET roll = $2, payout_lamports = $3::NUMERIC, status = $5
            WHERE id = (
                SELECT id FROM bets
                WHERE nonce = $1::NUMERIC
                ORDER BY id DESC
                LIMIT 1
            )
            AND status = ANY($4)
            "#,
        )
        .bind(nonce.to_string())
        .bind(roll)
        .bind(payout.as_u64().to_string())
        .bind(sources)
        .bind(status_to_str(BetStatus::RESOLVED))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn count_distinct_players(&self) -> Result<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT player) FROM bets")
            .fetch_one(&self.pool)
            .await?;

        Ok(total.max(0) as u64)
    }

    async fn count_created_since(&self, window: Duration) -> Result<u64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM bets
            WHERE created_at > NOW() - ($1::BIGINT * INTERVAL '1 second')
            "#,
        )
        .bind(window.num_seconds())
        .fetch_one(&self.pool)
        .await?;

        Ok(total.max(0) as u64)
    }

    async fn sum_amount(&self) -> Result<u128> {
        let total: String = sqlx::query_scalar(
            "SELECT COALESCE(SUM(bet_amount_lamports), 0)::TEXT FROM bets",
        )
        .fetch_one(&self.pool)
        .await?;

        parse_aggregate("total_volume", &total)
    }

    async fn sum_net_since(&self, window: Duration) -> Result<i128> {
        let total: String = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(bet_amount_lamports - payout_lamports), 0)::TEXT
            FROM bets
            WHERE created_at > NOW() - ($1::BIGINT * INTERVAL '1 second')
            "#,
        )
        .bind(window.num_seconds())
        .fetch_one(&self.pool)
        .await?;

        parse_aggregate("windowed_revenue", &total)
    }

    async fn latest(&self, limit: u32) -> Result<Vec<Bet>> {
        let sql = format!(
            r#"
            SELECT {BET_COLUMNS}
            FROM bets
            ORDER BY id DESC
            LIMIT $1
            "#
        );

        sqlx::query_as::<_, BetRow>(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Bet::try_from)
            .collect()
    }
}
