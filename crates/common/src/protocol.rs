//! Request and response types for the sealing service's JSON API.
//!
//! Binary fields travel as standard base64; sealed payloads travel in their
//! armored `v1.<nonce>.<ciphertext>` form.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Seal endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /seal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealRequest {
    /// Base64-encoded plaintext bytes.
    pub plaintext: String,
    /// Optional base64-encoded associated data. Authenticated, never returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aad: Option<String>,
}

/// Successful response body for `POST /seal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealResponse {
    /// Armored sealed payload.
    pub sealed: String,
}

// ---------------------------------------------------------------------------
// Open endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /open`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRequest {
    /// Armored sealed payload, as returned by `POST /seal`.
    pub sealed: String,
    /// Base64-encoded associated data supplied at seal time, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aad: Option<String>,
}

/// Successful response body for `POST /open`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenResponse {
    /// Base64-encoded plaintext bytes.
    pub plaintext: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` once the service is serving.
    pub status: String,
    /// Resolved algorithm name, e.g. `"aes-256-gcm"`.
    pub algorithm: String,
    /// Non-secret fingerprint of the loaded key.
    pub key_id: String,
}
