//! Bet status serialization and deserialization
//!
//! Converts between the BetStatus enum and the text stored in `bets.status`.

use crate::domain::BetStatus;

/// Convert BetStatus to its stored text
pub fn status_to_str(status: BetStatus) -> &'static str {
    status.as_str()
}

/// Parse BetStatus from stored text
pub fn status_from_str(s: &str) -> Option<BetStatus> {
    match s {
        "prepared_lock" => Some(BetStatus::PreparedLock),
        "prepared_resolve" => Some(BetStatus::PreparedResolve),
        _ => None,
    }
}
