use std::sync::Arc;

use crate::domain::{Bet, RecordBetRequest};
use crate::errors::{LedgerError, Result};
use crate::repository::LedgerStore;

/// Creates bets in the initial lifecycle state.
///
/// Nonce uniqueness is not checked here: colliding submissions are both
/// written and readers take the newest row.
#[derive(Clone)]
pub struct BetRecorder {
    store: Arc<dyn LedgerStore>,
}

impl BetRecorder {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self, request), fields(player = %request.player, bet_type = request.bet_type))]
    pub async fn record_bet(&self, request: RecordBetRequest) -> Result<Bet> {
        let new_bet = request.into_new_bet().map_err(|e| {
            let error = LedgerError::from(e);
            error.record("record_bet");
            error
        })?;

        let bet = self.store.insert(new_bet).await.map_err(|e| {
            e.record("record_bet");
            e
        })?;

        tracing::info!(
            bet.id = bet.id,
            bet.nonce = bet.nonce,
            bet.amount = bet.amount.as_u64(),
            bet.game = %bet.game,
            "Bet recorded"
        );
        metrics::counter!("bets_recorded_total").increment(1);

        Ok(bet)
    }
}
