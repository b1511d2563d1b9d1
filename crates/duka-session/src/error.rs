//! # Session Error Type
//!
//! Unified error type for the session layer.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Duka POS                               │
//! │                                                                         │
//! │  ValidationError (empty cart, missing payment, missing customer)        │
//! │    → rejected BEFORE any network call, blocking user message,           │
//! │      no partial state change                                            │
//! │                                                                         │
//! │  NetworkError (submission or catalog fetch failure)                     │
//! │    → failure notification; cart preserved exactly as before the         │
//! │      attempt; user retries manually (no automatic retry/backoff)        │
//! │                                                                         │
//! │  PersistenceError (notification mirror write fails)                     │
//! │    → swallowed inside NotificationCenter, logged, never reaches         │
//! │      this type                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use duka_api::ApiError;
use duka_core::CoreError;

/// Errors surfaced by the session layer.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Submission preconditions failed; nothing was sent.
    #[error("{0}")]
    Validation(#[from] CoreError),

    /// A remote call failed. State is preserved for manual retry.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// A submission is already in flight; the second trigger is refused.
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results with SessionError.
pub type SessionResult<T> = Result<T, SessionError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_converts() {
        let err: SessionError = CoreError::EmptyCart.into();
        assert!(matches!(err, SessionError::Validation(_)));
        assert_eq!(err.to_string(), "Cart is empty");
    }
}
