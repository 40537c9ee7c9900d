//! In-process implementations of the store traits
//!
//! Same contracts as the Postgres stores. Each operation runs under one
//! mutex acquisition, which gives it the per-statement atomicity the
//! database provides; nothing is held across operations.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use shared::LamportAmount;
use tokio::sync::Mutex;

use super::{LedgerStore, RulesStore};
use crate::domain::{Bet, BetStatus, NewBet, RuleSet};
use crate::errors::Result;

pub struct InMemoryLedgerStore {
    default_game: String,
    rows: Mutex<Vec<Bet>>,
}

impl InMemoryLedgerStore {
    pub fn new(default_game: impl Into<String>) -> Self {
        Self {
            default_game: default_game.into(),
            rows: Mutex::new(Vec::new()),
        }
    }

    /// Insert with an explicit creation time, for seeding windowed data.
    pub async fn insert_at(&self, bet: NewBet, created_at: DateTime<Utc>) -> Bet {
        let mut rows = self.rows.lock().await;
        let stored = Bet {
            id: rows.len() as i64 + 1,
            status: bet.status_or_default(),
            game: bet.game_or(&self.default_game).to_string(),
            player: bet.player,
            amount: bet.amount,
            bet_type: bet.bet_type,
            target: bet.target,
            roll: 0,
            payout: LamportAmount::ZERO,
            nonce: bet.nonce,
            expiry: bet.expiry,
            signature_ref: bet.signature_ref,
            created_at,
        };
        rows.push(stored.clone());
        stored
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

fn cutoff(window: Duration) -> DateTime<Utc> {
    Utc::now() - window
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn insert(&self, bet: NewBet) -> Result<Bet> {
        Ok(self.insert_at(bet, Utc::now()).await)
    }

    async fn find_latest_by_nonce(&self, nonce: u64) -> Result<Option<Bet>> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().rev().find(|b| b.nonce == nonce).cloned())
    }

    async fn apply_resolution(&self, nonce: u64, roll: i32, payout: LamportAmount) -> Result<u64> {
        let mut rows = self.rows.lock().await;
        let Some(bet) = rows.iter_mut().rev().find(|b| b.nonce == nonce) else {
            return Ok(0);
        };
        if !bet.status.can_transition_to(BetStatus::RESOLVED) {
            return Ok(0);
        }

        bet.roll = roll;
        bet.payout = payout;
        bet.status = BetStatus::RESOLVED;
        Ok(1)
    }

    async fn count_distinct_players(&self) -> Result<u64> {
        let rows = self.rows.lock().await;
        let players: std::collections::HashSet<&str> =
            rows.iter().map(|b| b.player.as_str()).collect();
        Ok(players.len() as u64)
    }

    async fn count_created_since(&self, window: Duration) -> Result<u64> {
        let since = cutoff(window);
        let rows = self.rows.lock().await;
        Ok(rows.iter().filter(|b| b.created_at > since).count() as u64)
    }

    async fn sum_amount(&self) -> Result<u128> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().map(|b| u128::from(b.amount.as_u64())).sum())
    }

    async fn sum_net_since(&self, window: Duration) -> Result<i128> {
        let since = cutoff(window);
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .filter(|b| b.created_at > since)
            .map(|b| i128::from(b.amount.as_u64()) - i128::from(b.payout.as_u64()))
            .sum())
    }

    async fn latest(&self, limit: u32) -> Result<Vec<Bet>> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().rev().take(limit as usize).cloned().collect())
    }
}

#[derive(Default)]
pub struct InMemoryRulesStore {
    rules: Mutex<Vec<RuleSet>>,
}

impl InMemoryRulesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new ruleset version and return its id.
    pub async fn publish(&self, fields: serde_json::Map<String, serde_json::Value>) -> i64 {
        let mut rules = self.rules.lock().await;
        let id = rules.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        rules.push(RuleSet { id, fields });
        id
    }
}

#[async_trait]
impl RulesStore for InMemoryRulesStore {
    async fn latest(&self) -> Result<Option<RuleSet>> {
        let rules = self.rules.lock().await;
        Ok(rules.iter().max_by_key(|r| r.id).cloned())
    }
}
