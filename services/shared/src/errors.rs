/// Shared error types for the wager ledger
///
/// Design Philosophy:
/// - Standardized error codes so callers (HTTP layers, jobs) can branch on them
/// - Categorized by error domain (Validation, Storage, NotFound, Internal)
/// - Includes an optional context field for debugging
///
/// Usage:
/// - The ledger crate converts its own error enum into ServiceError at the
///   boundary where an external caller needs a stable code
/// - Error codes follow pattern: <CATEGORY>_<SPECIFIC>
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error categories that map to HTTP status codes and logging severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Validation errors (400 Bad Request)
    /// Caller provided malformed or out-of-range input
    Validation,

    /// Storage errors (503 Service Unavailable)
    /// Connectivity, constraint or query failure in the ledger database
    Storage,

    /// Resource not found (404 Not Found)
    NotFound,

    /// Internal errors (500 Internal Server Error)
    /// Corrupt rows, misconfiguration, programming errors
    Internal,
}

impl ErrorCategory {
    /// Map error category to HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCategory::Validation => 400,
            ErrorCategory::Storage => 503,
            ErrorCategory::NotFound => 404,
            ErrorCategory::Internal => 500,
        }
    }

    /// Map error category to log level
    pub fn log_level(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "warn",
            ErrorCategory::Storage => "error",
            ErrorCategory::NotFound => "info",
            ErrorCategory::Internal => "error",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Storage => "storage",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::Internal => "internal",
        }
    }
}

/// Standard error codes used across the workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    // Validation errors
    pub const VALIDATION_INVALID_INPUT: ErrorCode = ErrorCode("VALIDATION_INVALID_INPUT");

    // Storage errors
    pub const STORAGE_QUERY_FAILED: ErrorCode = ErrorCode("STORAGE_QUERY_FAILED");
    pub const STORAGE_BOOTSTRAP_FAILED: ErrorCode = ErrorCode("STORAGE_BOOTSTRAP_FAILED");

    // Internal errors
    pub const INTERNAL_CORRUPT_ROW: ErrorCode = ErrorCode("INTERNAL_CORRUPT_ROW");
    pub const INTERNAL_UNEXPECTED: ErrorCode = ErrorCode("INTERNAL_UNEXPECTED");

    // Resource errors
    pub const NOT_FOUND_RULES: ErrorCode = ErrorCode("NOT_FOUND_RULES");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Standardized error structure handed to external callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    /// Error category (determines status code and log level)
    pub category: ErrorCategory,

    /// Structured error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context (e.g., field names, nonces, driver messages)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ServiceError {
    pub fn new(category: ErrorCategory, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            category,
            code: code.as_str().to_string(),
            message: message.into(),
            context: None,
        }
    }

    /// Add context to an error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::Validation,
            ErrorCode::VALIDATION_INVALID_INPUT,
            message,
        )
    }

    pub fn storage_error(error: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Storage,
            ErrorCode::STORAGE_QUERY_FAILED,
            "Ledger storage error",
        )
        .with_context(error.to_string())
    }

    pub fn rules_not_configured() -> Self {
        Self::new(
            ErrorCategory::NotFound,
            ErrorCode::NOT_FOUND_RULES,
            "No game rules configured",
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Internal, ErrorCode::INTERNAL_UNEXPECTED, message)
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "[{}] {}: {}", self.code, self.message, context)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ServiceError {}

pub type Result<T> = std::result::Result<T, ServiceError>;
