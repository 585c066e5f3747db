//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::crypto::FieldCodec;
use crate::fields::SensitiveFields;

/// Application state shared across all request handlers.
///
/// Both fields are `Arc`-wrapped so Axum can clone the state per request
/// without copying anything, and so handlers can move them into blocking
/// tasks.
#[derive(Clone)]
pub struct AppState {
    /// The envelope codec, bound to the process-wide passphrase.
    pub codec: Arc<FieldCodec>,
    /// Field paths designated as sensitive.
    pub fields: Arc<SensitiveFields>,
}

impl AppState {
    /// Create a new [`AppState`].
    pub fn new(codec: FieldCodec, fields: SensitiveFields) -> Self {
        Self {
            codec: Arc::new(codec),
            fields: Arc::new(fields),
        }
    }
}
