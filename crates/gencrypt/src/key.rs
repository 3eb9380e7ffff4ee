//! [`SecretKey`]: owned key material, plus the non-secret key fingerprint.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::algorithm::Algorithm;
use crate::error::CipherError;

/// Domain label mixed into every key fingerprint.
const KEY_ID_LABEL: &[u8] = b"gencrypt key id v1";

/// Number of HMAC output bytes kept in a key id.
const KEY_ID_LEN: usize = 8;

/// Owned symmetric key bytes.
///
/// The buffer is overwritten with zeroes on drop, and the key never shows up
/// in `Debug` output.
pub struct SecretKey {
    bytes: Vec<u8>,
}

impl SecretKey {
    /// Take ownership of raw key bytes. The length is checked later, when a
    /// [`Galois`](crate::Galois) is built from the key.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Decode a standard-alphabet base64 key. Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidFormat`] if the input is not valid base64.
    pub fn from_base64(encoded: &str) -> Result<Self, CipherError> {
        STANDARD
            .decode(encoded.trim())
            .map(Self::from_bytes)
            .map_err(|_| CipherError::InvalidFormat("key is not valid base64"))
    }

    /// Generate a fresh key of the right length for `algorithm` from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::RandomSource`] if the OS random source fails.
    pub fn generate(algorithm: Algorithm) -> Result<Self, CipherError> {
        let mut key = Self::from_bytes(vec![0u8; algorithm.key_len()]);
        OsRng
            .try_fill_bytes(&mut key.bytes)
            .map_err(|e| CipherError::RandomSource(e.to_string()))?;
        Ok(key)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

/// Non-secret fingerprint of `key`: base64url of the first 8 bytes of
/// `HMAC-SHA256(key, KEY_ID_LABEL)`.
///
/// # Errors
///
/// Returns [`CipherError::ConstructionFailure`] if the MAC cannot be keyed.
pub(crate) fn key_id(key: &[u8]) -> Result<String, CipherError> {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(key).map_err(|_| CipherError::ConstructionFailure)?;
    mac.update(KEY_ID_LABEL);
    let digest = mac.finalize().into_bytes();
    Ok(URL_SAFE_NO_PAD.encode(&digest[..KEY_ID_LEN]))
}
