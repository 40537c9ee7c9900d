use std::sync::Arc;

use shared::LamportAmount;

use crate::domain::{ResolveBetRequest, ResolveOutcome};
use crate::errors::{LedgerError, Result};
use crate::repository::LedgerStore;

/// Moves bets from `prepared_lock` to `prepared_resolve`.
///
/// The transition is a single conditional write in the store, so two
/// resolvers racing on one nonce produce one `Applied` and one `NoOp`.
#[derive(Clone)]
pub struct BetResolver {
    store: Arc<dyn LedgerStore>,
}

impl BetResolver {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self, payout), fields(payout = payout.as_u64()))]
    pub async fn resolve(&self, nonce: u64, roll: i32, payout: LamportAmount) -> Result<ResolveOutcome> {
        let changed = self
            .store
            .apply_resolution(nonce, roll, payout)
            .await
            .map_err(|e| {
                e.record("resolve");
                e
            })?;

        match changed {
            1 => {
                tracing::info!("Bet resolved");
                metrics::counter!("bets_resolved_total").increment(1);
                Ok(ResolveOutcome::Applied)
            }
            0 => {
                tracing::warn!("Bet already resolved or not found");
                metrics::counter!("bet_resolutions_noop_total").increment(1);
                Ok(ResolveOutcome::NoOp)
            }
            n => {
                let error = LedgerError::UnexpectedRowCount(n);
                error.record("resolve");
                Err(error)
            }
        }
    }

    /// Validate wire input, then [`Self::resolve`].
    pub async fn resolve_request(&self, request: &ResolveBetRequest) -> Result<ResolveOutcome> {
        let (nonce, roll, payout) = request.validate().map_err(|e| {
            let error = LedgerError::from(e);
            error.record("resolve");
            error
        })?;
        self.resolve(nonce, roll, payout).await
    }

    /// Resolve only if the bet's expiry has not passed at `now_unix`.
    /// Expiry is immutable once recorded.
    pub async fn resolve_before_expiry(
        &self,
        nonce: u64,
        roll: i32,
        payout: LamportAmount,
        now_unix: u64,
    ) -> Result<ResolveOutcome> {
        let latest = self.store.find_latest_by_nonce(nonce).await.map_err(|e| {
            e.record("resolve");
            e
        })?;
        let Some(bet) = latest else {
            tracing::debug!(nonce, "No bet to resolve");
            return Ok(ResolveOutcome::NoOp);
        };

        if bet.is_expired_at(now_unix) {
            tracing::warn!(nonce, expiry = bet.expiry, now_unix, "Bet expired before resolution");
            return Ok(ResolveOutcome::Expired);
        }

        self.resolve(nonce, roll, payout).await
    }
}
