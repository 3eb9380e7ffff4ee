//! Service-level error type for the HTTP boundary.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::PayloadTooLarge`] → 413
/// - [`ServiceError::EncryptionFailure`] → 500
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed, or the sealed payload failed to open.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the configured size limit.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// Sealing failed inside the crypto layer (entropy, length limit).
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::PayloadTooLarge(_) => 413,
            ServiceError::EncryptionFailure(_) => 500,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code for the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::PayloadTooLarge(_) => "payload_too_large",
            ServiceError::EncryptionFailure(_) => "encryption_failure",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
