/// Type-safe wrappers for ledger primitives
///
/// Monetary values never pass through floating point here: display
/// formatting uses integer division and remainder.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be an integer, got {value}")]
    NotAnInteger { field: &'static str, value: String },

    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: String },

    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: String },

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("Aggregation window must be non-negative, got {seconds}s")]
    NegativeWindow { seconds: i64 },
}

/// Type-safe lamport amount
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LamportAmount(u64);

impl LamportAmount {
    pub const ZERO: LamportAmount = LamportAmount(0);

    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Get the raw lamport value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Render in whole display units with `decimals` fractional digits.
    ///
    /// Rounds half-up at the last shown digit. `decimals` above
    /// [`LAMPORT_DECIMALS`] is clamped since there is nothing below a lamport.
    pub fn to_display(&self, decimals: u32) -> String {
        let decimals = decimals.min(LAMPORT_DECIMALS);
        let divisor = 10u128.pow(LAMPORT_DECIMALS - decimals);
        let rounded = (self.0 as u128 + divisor / 2) / divisor;

        if decimals == 0 {
            return rounded.to_string();
        }

        let unit = 10u128.pow(decimals);
        format!(
            "{}.{:0width$}",
            rounded / unit,
            rounded % unit,
            width = decimals as usize
        )
    }
}

impl From<u64> for LamportAmount {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl From<LamportAmount> for u64 {
    fn from(amount: LamportAmount) -> Self {
        amount.0
    }
}

impl std::fmt::Display for LamportAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} lamports ({} SOL)", self.0, self.to_display(LAMPORT_DECIMALS))
    }
}
