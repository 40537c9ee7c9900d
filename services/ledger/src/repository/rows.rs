//! Decoding of `bets` rows into domain objects
//!
//! The u64 columns are `NUMERIC(20,0)` in Postgres since BIGINT stops at
//! i64::MAX. They are selected as `::TEXT` and parsed here, so no value
//! ever passes through a float on the way out of the database.

use chrono::{DateTime, Utc};
use shared::LamportAmount;

use super::status::status_from_str;
use crate::domain::Bet;
use crate::errors::{LedgerError, Result};

/// Column list shared by every query that returns whole bets.
pub const BET_COLUMNS: &str = r#"
    id, player,
    bet_amount_lamports::TEXT AS bet_amount_lamports,
    bet_type, target, roll,
    payout_lamports::TEXT AS payout_lamports,
    nonce::TEXT AS nonce,
    expiry_unix::TEXT AS expiry_unix,
    signature_base58, status, game, created_at
"#;

#[derive(Debug, sqlx::FromRow)]
pub struct BetRow {
    pub id: i64,
    pub player: String,
    pub bet_amount_lamports: String,
    pub bet_type: i16,
    pub target: i32,
    pub roll: i32,
    pub payout_lamports: String,
    pub nonce: String,
    pub expiry_unix: String,
    pub signature_base58: String,
    pub status: String,
    pub game: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<BetRow> for Bet {
    type Error = LedgerError;

    fn try_from(row: BetRow) -> Result<Self> {
        let id = row.id;
        let status = status_from_str(&row.status).ok_or_else(|| {
            LedgerError::Decode(format!("bet {}: unknown status '{}'", id, row.status))
        })?;

        Ok(Bet {
            id,
            amount: LamportAmount::new(parse_u64(id, "bet_amount_lamports", &row.bet_amount_lamports)?),
            payout: LamportAmount::new(parse_u64(id, "payout_lamports", &row.payout_lamports)?),
            nonce: parse_u64(id, "nonce", &row.nonce)?,
            expiry: parse_u64(id, "expiry_unix", &row.expiry_unix)?,
            player: row.player,
            bet_type: row.bet_type,
            target: row.target,
            roll: row.roll,
            signature_ref: row.signature_base58,
            status,
            game: row.game,
            created_at: row.created_at,
        })
    }
}

fn parse_u64(id: i64, column: &str, text: &str) -> Result<u64> {
    text.parse::<u64>()
        .map_err(|e| LedgerError::Decode(format!("bet {}: {} = '{}': {}", id, column, text, e)))
}

/// Parse an aggregate rendered with `::TEXT`.
pub fn parse_aggregate<T: std::str::FromStr>(name: &str, text: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    text.parse::<T>()
        .map_err(|e| LedgerError::Decode(format!("{} = '{}': {}", name, text, e)))
}
