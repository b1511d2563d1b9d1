//! # API Error Types
//!
//! Network error taxonomy for the remote API layer.
//!
//! ## Design Principles
//! - A failed call surfaces exactly once; this layer never retries.
//! - The session layer decides what a failure means (failure
//!   notification, swallowed persistence error, etc.).

use thiserror::Error;

// =============================================================================
// Api Error
// =============================================================================

/// Errors from the remote API layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, timeout, TLS.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode {endpoint} response: {reason}")]
    Decode { endpoint: String, reason: String },

    /// The transaction response carried neither `transaction_number`
    /// nor `id`, so the resulting Transaction cannot be labelled.
    #[error("Transaction response carried no identifier")]
    MissingIdentifier,
}

/// Convenience type alias for Results with ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = ApiError::Status {
            endpoint: "POST /transactions".to_string(),
            status: 422,
            body: "insufficient stock".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "POST /transactions returned HTTP 422: insufficient stock"
        );
    }
}
