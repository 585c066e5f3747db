//! Request and response types exchanged with the service.
//!
//! All bodies are JSON. The `payload` carried by the protect/reveal endpoints
//! is an arbitrary record object — typically a job application — whose
//! designated sensitive fields are rewritten in place.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Protect endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /protect`.
///
/// Sensitive string fields inside `payload` (e.g. `ssn`, `dateOfBirth`) are
/// replaced with base64 encryption envelopes before the caller persists the
/// record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectRequest {
    /// Record object whose sensitive fields will be encrypted.
    pub payload: serde_json::Value,
}

/// Successful response body for `POST /protect`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectResponse {
    /// Input structure with sensitive fields replaced by envelopes.
    pub payload: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Reveal endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /reveal`.
///
/// The inverse of `/protect`: envelopes at the designated field paths are
/// decrypted back to their original values. Values that were never encrypted
/// (legacy records) pass through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealRequest {
    /// Record object whose sensitive fields will be decrypted.
    pub payload: serde_json::Value,
}

/// Successful response body for `POST /reveal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealResponse {
    /// Input structure with sensitive fields restored to plaintext.
    pub payload: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"decryption_failed"`).
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
    /// Overall service status: `"ok"`.
    pub status: String,
    /// Service version, from the crate manifest.
    pub version: String,
    /// Number of sensitive field paths the service is configured to protect.
    pub sensitive_fields: usize,
}
