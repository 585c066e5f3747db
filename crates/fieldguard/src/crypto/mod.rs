//! Envelope encryption primitives for individual string fields.
//!
//! This module is free of HTTP dependencies. It provides the low-level
//! protect/reveal operations applied to sensitive record fields.
//!
//! # Envelope format
//!
//! ```text
//! base64( salt[64] || iv[16] || tag[16] || ciphertext )
//! ```
//!
//! The key is never stored: it is re-derived on every call from the
//! process-wide passphrase and the envelope's own salt (PBKDF2-HMAC-SHA-512,
//! 100,000 iterations). Fresh salt and IV per call mean two encryptions of
//! the same value never produce the same envelope.

pub mod codec;
pub mod envelope;

pub use codec::{CodecError, FieldCodec, Passphrase};
