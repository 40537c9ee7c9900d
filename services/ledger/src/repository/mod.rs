pub mod ledger_store;
pub mod memory;
pub mod rules_store;

mod rows;
mod status;

pub use ledger_store::{LedgerStore, PgLedgerStore};
pub use memory::{InMemoryLedgerStore, InMemoryRulesStore};
pub use rules_store::{PgRulesStore, RulesStore};
pub use status::{status_from_str, status_to_str};
