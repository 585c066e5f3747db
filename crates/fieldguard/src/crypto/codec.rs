//! PBKDF2 key derivation and AES-256-GCM encryption of field values.
//!
//! **Key isolation:** every envelope carries its own 64-byte salt, and the
//! AES key is re-derived from the passphrase + salt on each call. Compromise
//! of one derived key exposes one field value, not the whole store. The KDF
//! cost (100,000 SHA-512 iterations) is deliberate and is paid per call; at
//! two fields per record this is nowhere near a hot path.
//!
//! **Legacy tolerance:** `reveal` passes through values that do not look
//! like envelopes (wrong alphabet, too short) unchanged — records written
//! before encryption was introduced hold raw plaintext. A value that *does*
//! parse as an envelope but fails tag verification is a hard
//! [`CodecError::DecryptionFailed`], never silently echoed back.

use aes_gcm::{
    aead::{consts::U16, rand_core::RngCore, Aead, KeyInit, OsRng},
    aes::Aes256,
    AesGcm, Nonce,
};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use thiserror::Error;

use super::envelope::{Envelope, IV_LEN, KEY_LEN, SALT_LEN, TAG_LEN};

/// AES-256-GCM instantiated with the 16-byte IV the envelope format carries.
type EnvelopeCipher = AesGcm<Aes256, U16>;

/// PBKDF2-HMAC-SHA-512 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Errors produced by the codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Tag verification failed: tampered ciphertext, corruption, or a
    /// passphrase that does not match the one used to encrypt.
    #[error("decryption failed: authentication tag mismatch")]
    DecryptionFailed,

    /// The decrypted bytes are not valid UTF-8. Only reachable if an
    /// envelope was produced from non-UTF-8 input by some other writer.
    #[error("decryption failed: plaintext is not valid UTF-8")]
    InvalidPlaintext,

    /// An internal AEAD error during encryption (unreachable with a
    /// correctly derived key).
    #[error("aead operation failed")]
    AeadFailure,
}

/// The process-wide secret passphrase.
///
/// Constructed once at startup from configuration and injected into
/// [`FieldCodec`]; never read from ambient global state, so tests can run
/// codecs with distinct keys side by side. Memory is zeroed on drop.
pub struct Passphrase(Box<[u8]>);

impl Passphrase {
    /// Wrap a passphrase string.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into().into_bytes().into_boxed_slice())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for Passphrase {
    fn drop(&mut self) {
        // Zero the secret on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret — not even in debug builds.
        f.write_str("Passphrase([REDACTED])")
    }
}

/// Stateless field codec bound to one passphrase.
///
/// Pure, synchronous, and safe to call from any number of threads
/// concurrently; the only state is the immutable passphrase.
#[derive(Debug)]
pub struct FieldCodec {
    passphrase: Passphrase,
}

impl FieldCodec {
    /// Create a codec bound to `passphrase`.
    pub fn new(passphrase: Passphrase) -> Self {
        Self { passphrase }
    }

    /// Encrypt `plaintext` into a fresh envelope string.
    ///
    /// A new salt and IV are drawn from the OS CSPRNG on every call, so
    /// repeated calls on the same input produce different envelopes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::AeadFailure`] on an internal cipher error. On
    /// failure no output is produced — plaintext is never returned disguised
    /// as an envelope.
    pub fn protect(&self, plaintext: &str) -> Result<String, CodecError> {
        let mut salt = [0u8; SALT_LEN];
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut iv);

        let key = self.derive_key(&salt);
        let cipher =
            EnvelopeCipher::new_from_slice(&key).map_err(|_| CodecError::AeadFailure)?;

        // The Aead API appends the tag to the ciphertext; the envelope
        // layout stores it ahead of the ciphertext instead.
        let mut sealed = cipher
            .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
            .map_err(|_| CodecError::AeadFailure)?;
        let ciphertext_len = sealed.len() - TAG_LEN;
        let tag_bytes = sealed.split_off(ciphertext_len);
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&tag_bytes);

        Ok(Envelope {
            salt,
            iv,
            tag,
            ciphertext: sealed,
        }
        .encode())
    }

    /// Decrypt a stored value back to its plaintext.
    ///
    /// Values that do not parse as envelopes are returned unchanged — the
    /// store predates encryption and still holds raw legacy values for old
    /// records.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::DecryptionFailed`] when tag verification fails
    /// (tampering, corruption, or wrong passphrase).
    pub fn reveal(&self, stored: &str) -> Result<String, CodecError> {
        let env = match Envelope::decode(stored) {
            Some(env) => env,
            None => return Ok(stored.to_owned()),
        };

        let key = self.derive_key(&env.salt);
        let cipher =
            EnvelopeCipher::new_from_slice(&key).map_err(|_| CodecError::AeadFailure)?;

        let mut sealed = env.ciphertext;
        sealed.extend_from_slice(&env.tag);
        let plaintext = cipher
            .decrypt(Nonce::from_slice(&env.iv), sealed.as_slice())
            .map_err(|_| CodecError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| CodecError::InvalidPlaintext)
    }

    /// Stretch the passphrase and `salt` into an AES-256 key.
    fn derive_key(&self, salt: &[u8]) -> [u8; KEY_LEN] {
        let mut key = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha512>(self.passphrase.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::envelope::MIN_LEN;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    fn codec() -> FieldCodec {
        FieldCodec::new(Passphrase::new("unit-test-passphrase"))
    }

    #[test]
    fn round_trip_ssn() {
        let c = codec();
        let stored = c.protect("123-45-6789").unwrap();
        assert_eq!(c.reveal(&stored).unwrap(), "123-45-6789");
    }

    #[test]
    fn round_trip_iso_date() {
        let c = codec();
        let stored = c.protect("2001-07-04").unwrap();
        assert_eq!(c.reveal(&stored).unwrap(), "2001-07-04");
    }

    #[test]
    fn round_trip_non_ascii() {
        let c = codec();
        let stored = c.protect("José Müller — 1999-12-31").unwrap();
        assert_eq!(c.reveal(&stored).unwrap(), "José Müller — 1999-12-31");
    }

    #[test]
    fn envelopes_are_unique_per_call() {
        let c = codec();
        let a = c.protect("123-45-6789").unwrap();
        let b = c.protect("123-45-6789").unwrap();
        assert_ne!(a, b, "fresh salt/iv must yield distinct envelopes");
    }

    #[test]
    fn ciphertext_length_matches_plaintext() {
        let c = codec();
        let stored = c.protect("987-65-4321").unwrap();
        let bytes = STANDARD.decode(stored).unwrap();
        assert_eq!(bytes.len() - MIN_LEN, "987-65-4321".len());
    }

    #[test]
    fn tampered_ciphertext_fails_auth() {
        let c = codec();
        let stored = c.protect("987-65-4321").unwrap();
        let mut bytes = STANDARD.decode(stored).unwrap();
        // Flip one byte in the ciphertext portion.
        bytes[MIN_LEN] ^= 0x01;
        let tampered = STANDARD.encode(bytes);
        assert!(matches!(
            c.reveal(&tampered),
            Err(CodecError::DecryptionFailed)
        ));
    }

    #[test]
    fn tampered_tag_fails_auth() {
        let c = codec();
        let stored = c.protect("987-65-4321").unwrap();
        let mut bytes = STANDARD.decode(stored).unwrap();
        bytes[MIN_LEN - 1] ^= 0xFF;
        let tampered = STANDARD.encode(bytes);
        assert!(c.reveal(&tampered).is_err());
    }

    #[test]
    fn wrong_passphrase_fails_auth() {
        let stored = codec().protect("123-45-6789").unwrap();
        let other = FieldCodec::new(Passphrase::new("a-different-passphrase"));
        assert!(matches!(
            other.reveal(&stored),
            Err(CodecError::DecryptionFailed)
        ));
    }

    #[test]
    fn legacy_plaintext_passes_through() {
        let c = codec();
        assert_eq!(c.reveal("not-base64-at-all!").unwrap(), "not-base64-at-all!");
    }

    #[test]
    fn short_base64_passes_through() {
        // Decodes cleanly but to fewer than 96 bytes: treated as legacy data.
        let short = STANDARD.encode([0u8; 48]);
        assert_eq!(codec().reveal(&short).unwrap(), short);
    }

    #[test]
    fn one_byte_below_minimum_passes_through() {
        let short = STANDARD.encode([0u8; MIN_LEN - 1]);
        assert_eq!(codec().reveal(&short).unwrap(), short);
    }

    #[test]
    fn reveal_is_idempotent_per_stored_value() {
        let c = codec();
        let stored = c.protect("987-65-4321").unwrap();
        assert_eq!(c.reveal(&stored).unwrap(), "987-65-4321");
        assert_eq!(c.reveal(&stored).unwrap(), "987-65-4321");
    }

    #[test]
    fn passphrase_redacted_in_debug() {
        let p = Passphrase::new("hunter2");
        assert!(format!("{p:?}").contains("REDACTED"));
        assert!(!format!("{p:?}").contains("hunter2"));
    }
}
