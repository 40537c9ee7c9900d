use std::sync::Arc;

use chrono::Duration;
use shared::{ValidationError, DISPLAY_DECIMALS, MAX_ACTIVITY_LIMIT};

use crate::config::DashboardConfig;
use crate::domain::{ActivityEntry, Bet, DashboardSnapshot, Outcome};
use crate::errors::{LedgerError, Result};
use crate::repository::LedgerStore;

/// Read-only views over the ledger for the operations dashboard.
///
/// Figures are computed on every call and reflect whatever was committed
/// when the query ran.
#[derive(Clone)]
pub struct DashboardAggregator {
    store: Arc<dyn LedgerStore>,
    config: DashboardConfig,
}

impl DashboardAggregator {
    pub fn new(store: Arc<dyn LedgerStore>, config: DashboardConfig) -> Self {
        Self { store, config }
    }

    /// Distinct players across all bets.
    pub async fn total_users(&self) -> Result<u64> {
        self.store.count_distinct_players().await
    }

    /// Bets created within the trailing `window`.
    pub async fn active_games(&self, window: Duration) -> Result<u64> {
        check_window(window)?;
        self.store.count_created_since(window).await
    }

    /// Exact sum of every wagered amount.
    pub async fn total_volume(&self) -> Result<u128> {
        self.store.sum_amount().await
    }

    /// Wagered minus paid out within `window`. Negative when the house lost.
    pub async fn windowed_revenue(&self, window: Duration) -> Result<i128> {
        check_window(window)?;
        self.store.sum_net_since(window).await
    }

    /// The `limit` newest bets, newest first. Limits above
    /// [`MAX_ACTIVITY_LIMIT`] are reduced to it.
    pub async fn recent_activity(&self, limit: u32) -> Result<Vec<ActivityEntry>> {
        if limit > MAX_ACTIVITY_LIMIT {
            tracing::debug!(requested = limit, max = MAX_ACTIVITY_LIMIT, "Clamping activity limit");
        }
        let limit = limit.min(MAX_ACTIVITY_LIMIT);
        let bets = self.store.latest(limit).await?;
        tracing::debug!(limit, returned = bets.len(), "Loaded recent activity");
        Ok(bets.iter().map(activity_entry).collect())
    }

    /// Every dashboard figure using the configured window and feed size.
    #[tracing::instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<DashboardSnapshot> {
        let window = self.config.window();

        let snapshot = DashboardSnapshot {
            total_users: self.total_users().await?,
            active_games: self.active_games(window).await?,
            total_volume: self.total_volume().await?,
            windowed_revenue: self.windowed_revenue(window).await?,
            recent_activity: self.recent_activity(self.config.activity_limit).await?,
        };

        tracing::debug!(
            total_users = snapshot.total_users,
            active_games = snapshot.active_games,
            "Dashboard snapshot computed"
        );
        Ok(snapshot)
    }
}

fn check_window(window: Duration) -> Result<()> {
    if window < Duration::zero() {
        return Err(LedgerError::from(ValidationError::NegativeWindow {
            seconds: window.num_seconds(),
        }));
    }
    Ok(())
}

/// Project a bet onto one line of the activity feed.
pub fn activity_entry(bet: &Bet) -> ActivityEntry {
    let outcome = Outcome::from_payout(bet.payout);

    ActivityEntry {
        player: bet.player.clone(),
        game: bet.game.clone(),
        outcome_label: outcome,
        signed_amount_text: format!("{}{}", outcome.sign(), bet.payout.to_display(DISPLAY_DECIMALS)),
        time_of_day: bet.created_at.format("%H:%M:%S").to_string(),
    }
}
