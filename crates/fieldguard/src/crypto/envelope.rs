//! Binary layout and base64 framing of the encryption envelope.

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Byte length of the per-envelope KDF salt.
pub const SALT_LEN: usize = 64;

/// Byte length of the AES-GCM initialisation vector.
pub const IV_LEN: usize = 16;

/// Byte length of the AES-GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// Byte length of the derived AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Smallest decoded size a well-formed envelope can have (empty plaintext).
pub const MIN_LEN: usize = SALT_LEN + IV_LEN + TAG_LEN;

/// A parsed encryption envelope.
///
/// Serialised as the byte concatenation `salt || iv || tag || ciphertext`,
/// base64-encoded with the standard alphabet (the encoding historical
/// records were stored with).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Per-envelope KDF salt.
    pub salt: [u8; SALT_LEN],
    /// Per-envelope cipher IV.
    pub iv: [u8; IV_LEN],
    /// Authentication tag over the ciphertext.
    pub tag: [u8; TAG_LEN],
    /// Encrypted payload; same length as the plaintext's UTF-8 encoding.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Encode this envelope to its stored string representation.
    pub fn encode(&self) -> String {
        let mut bytes = Vec::with_capacity(MIN_LEN + self.ciphertext.len());
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.iv);
        bytes.extend_from_slice(&self.tag);
        bytes.extend_from_slice(&self.ciphertext);
        STANDARD.encode(bytes)
    }

    /// Parse a stored string back into an [`Envelope`].
    ///
    /// Returns `None` when the input is not plausibly an envelope: characters
    /// outside the standard base64 alphabet, a failed decode, or a decoded
    /// length below [`MIN_LEN`]. Callers treat `None` as a legacy unencrypted
    /// value and pass the input through unchanged.
    pub fn decode(stored: &str) -> Option<Self> {
        if !is_base64_alphabet(stored) {
            return None;
        }
        let bytes = STANDARD.decode(stored).ok()?;
        if bytes.len() < MIN_LEN {
            return None;
        }

        let mut salt = [0u8; SALT_LEN];
        let mut iv = [0u8; IV_LEN];
        let mut tag = [0u8; TAG_LEN];
        salt.copy_from_slice(&bytes[..SALT_LEN]);
        iv.copy_from_slice(&bytes[SALT_LEN..SALT_LEN + IV_LEN]);
        tag.copy_from_slice(&bytes[SALT_LEN + IV_LEN..MIN_LEN]);

        Some(Self {
            salt,
            iv,
            tag,
            ciphertext: bytes[MIN_LEN..].to_vec(),
        })
    }
}

/// Whether `s` consists solely of standard base64 characters (`A–Z a–z 0–9 + / =`).
fn is_base64_alphabet(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
}
