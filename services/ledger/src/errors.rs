use shared::errors::{ErrorCategory, ErrorCode, ServiceError};
use shared::ValidationError;

/// Errors raised by ledger operations.
///
/// "Not found" and "already resolved" are not errors: lookups return
/// `Option` and resolution returns [`crate::domain::ResolveOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Failed to decode ledger value: {0}")]
    Decode(String),

    #[error("Resolution changed {0} rows, expected at most one")]
    UnexpectedRowCount(u64),

    #[error("No game rules configured")]
    NoRulesConfigured,

    #[error("Schema bootstrap failed: {0}")]
    Bootstrap(String),
}

impl LedgerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LedgerError::Validation(_) => ErrorCategory::Validation,
            LedgerError::Storage(_) | LedgerError::Bootstrap(_) => ErrorCategory::Storage,
            LedgerError::NoRulesConfigured => ErrorCategory::NotFound,
            LedgerError::Decode(_) | LedgerError::UnexpectedRowCount(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// Log at the category's level and count it.
    pub(crate) fn record(&self, operation: &'static str) {
        let category = self.category();
        match category {
            ErrorCategory::Validation | ErrorCategory::NotFound => {
                tracing::warn!(operation, error = %self, "Ledger operation rejected")
            }
            ErrorCategory::Storage | ErrorCategory::Internal => {
                tracing::error!(operation, error = ?self, "Ledger operation failed")
            }
        }
        metrics::counter!(
            "ledger_errors_total",
            "operation" => operation,
            "category" => category.as_str()
        )
        .increment(1);
    }
}

impl From<&LedgerError> for ServiceError {
    fn from(error: &LedgerError) -> Self {
        match error {
            LedgerError::Validation(e) => ServiceError::invalid_input(e.to_string()),
            LedgerError::Storage(e) => ServiceError::storage_error(e),
            LedgerError::Decode(msg) => ServiceError::new(
                ErrorCategory::Internal,
                ErrorCode::INTERNAL_CORRUPT_ROW,
                "Corrupt ledger row",
            )
            .with_context(msg.clone()),
            LedgerError::UnexpectedRowCount(n) => {
                ServiceError::internal(format!("Resolution changed {} rows", n))
            }
            LedgerError::NoRulesConfigured => ServiceError::rules_not_configured(),
            LedgerError::Bootstrap(msg) => ServiceError::new(
                ErrorCategory::Storage,
                ErrorCode::STORAGE_BOOTSTRAP_FAILED,
                "Schema bootstrap failed",
            )
            .with_context(msg.clone()),
        }
    }
}

impl From<LedgerError> for ServiceError {
    fn from(error: LedgerError) -> Self {
        ServiceError::from(&error)
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
