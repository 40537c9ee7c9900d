use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::RuleSet;
use crate::errors::Result;

/// Versioned `game_rules` table. Newest `id` wins.
#[async_trait]
pub trait RulesStore: Send + Sync {
    async fn latest(&self) -> Result<Option<RuleSet>>;
}

pub struct PgRulesStore {
    pool: PgPool,
}

impl PgRulesStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RulesStore for PgRulesStore {
    async fn latest(&self) -> Result<Option<RuleSet>> {
        // The ledger does not know the ruleset columns; the row travels as JSON.
        let row: Option<(i64, serde_json::Value)> = sqlx::query_as(
            r#"
            SELECT r.id, to_jsonb(r) AS body
            FROM game_rules r
            ORDER BY r.id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, body)| RuleSet::from_row_json(id, body)))
    }
}
