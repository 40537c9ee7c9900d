use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::repository::{
    InMemoryLedgerStore, InMemoryRulesStore, LedgerStore, PgLedgerStore, PgRulesStore, RulesStore,
};
use crate::services::{BetRecorder, BetResolver, DashboardAggregator, RulesProvider};

/// The ledger components wired to one storage backend.
#[derive(Clone)]
pub struct Ledger {
    pub config: Arc<Config>,
    pub recorder: BetRecorder,
    pub resolver: BetResolver,
    pub dashboard: DashboardAggregator,
    pub rules: RulesProvider,
}

impl Ledger {
    pub fn new(config: Config, store: Arc<dyn LedgerStore>, rules: Arc<dyn RulesStore>) -> Self {
        Self {
            recorder: BetRecorder::new(store.clone()),
            resolver: BetResolver::new(store.clone()),
            dashboard: DashboardAggregator::new(store, config.dashboard.clone()),
            rules: RulesProvider::new(rules),
            config: Arc::new(config),
        }
    }

    /// Wire every component to the given pool. The pool stays owned by the
    /// caller, which is responsible for closing it.
    pub fn postgres(config: Config, pool: PgPool) -> Self {
        let store = Arc::new(PgLedgerStore::new(pool.clone(), config.ledger.default_game.clone()));
        let rules = Arc::new(PgRulesStore::new(pool));
        Self::new(config, store, rules)
    }

    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(InMemoryLedgerStore::new(config.ledger.default_game.clone()));
        Self::new(config, store, Arc::new(InMemoryRulesStore::new()))
    }
}
