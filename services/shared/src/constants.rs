/// Shared constants for the wager ledger
///
/// This module centralizes the magic numbers used by the ledger, its
/// bootstrap glue and the dashboard so that every consumer agrees on them.

/// Number of decimal digits between a lamport and a whole display unit
/// (1 SOL = 10^9 lamports)
pub const LAMPORT_DECIMALS: u32 = 9;

/// Decimal places shown by the dashboard activity feed
pub const DISPLAY_DECIMALS: u32 = 4;

/// Game tag stored when a bet arrives without one
pub const DEFAULT_GAME: &str = "dice";

/// Status written on insert when the caller does not supply one
pub const INITIAL_STATUS: &str = "prepared_lock";

/// Status written once an outcome has been recorded
pub const RESOLVED_STATUS: &str = "prepared_resolve";

/// Default trailing window for dashboard aggregates (24 hours)
pub const DEFAULT_WINDOW_SECS: i64 = 86_400;

/// Default number of rows in the recent activity feed
pub const DEFAULT_ACTIVITY_LIMIT: u32 = 5;

/// Upper bound on the recent activity feed
///
/// Keeps a misconfigured dashboard from pulling the whole ledger.
pub const MAX_ACTIVITY_LIMIT: u32 = 100;

/// Default connection pool size
pub const DEFAULT_POOL_SIZE: u32 = 20;
