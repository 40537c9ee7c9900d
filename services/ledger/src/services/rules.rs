use std::sync::Arc;

use crate::domain::RuleSet;
use crate::errors::{LedgerError, Result};
use crate::repository::RulesStore;

#[derive(Clone)]
pub struct RulesProvider {
    store: Arc<dyn RulesStore>,
}

impl RulesProvider {
    pub fn new(store: Arc<dyn RulesStore>) -> Self {
        Self { store }
    }

    /// Newest ruleset, or `None` when none has been published.
    pub async fn get_active_rules(&self) -> Result<Option<RuleSet>> {
        let rules = self.store.latest().await?;
        match &rules {
            Some(rules) => tracing::debug!(rules.id = rules.id, "Active rules loaded"),
            None => tracing::debug!("No game rules configured"),
        }
        Ok(rules)
    }

    /// Like [`Self::get_active_rules`] for callers that cannot run without rules.
    pub async fn require_active_rules(&self) -> Result<RuleSet> {
        self.get_active_rules()
            .await?
            .ok_or(LedgerError::NoRulesConfigured)
    }
}
