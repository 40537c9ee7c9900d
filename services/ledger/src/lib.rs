// Library interface for the wager ledger - exposes modules for testing and embedding

pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod repository;
pub mod services;
pub mod state;

pub use config::Config;
pub use domain::{Bet, BetStatus, RecordBetRequest, ResolveBetRequest, ResolveOutcome, RuleSet};
pub use errors::{LedgerError, Result};
pub use state::Ledger;
