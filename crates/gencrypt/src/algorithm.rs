//! Closed set of supported modes and the algorithms they resolve to.
//!
//! The key length picks the AES strength; the [`Mode`] picks the
//! authenticated construction. Resolution happens once, at construction time.

use std::fmt;
use std::str::FromStr;

use crate::error::CipherError;

/// Authenticated counter mode wrapped around AES.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// AES-GCM (NIST SP 800-38D). The reference mode.
    #[default]
    AesGcm,
    /// AES-GCM-SIV (RFC 8452). Nonce-misuse-resistant; no 192-bit variant.
    AesGcmSiv,
}

impl Mode {
    /// Key lengths, in bytes, this mode accepts.
    pub fn key_sizes(self) -> &'static [usize] {
        match self {
            Mode::AesGcm => &[16, 24, 32],
            Mode::AesGcmSiv => &[16, 32],
        }
    }

    /// Stable identifier, as accepted by [`Mode::from_str`].
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::AesGcm => "aes-gcm",
            Mode::AesGcmSiv => "aes-gcm-siv",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aes-gcm" => Ok(Mode::AesGcm),
            "aes-gcm-siv" => Ok(Mode::AesGcmSiv),
            other => Err(CipherError::UnknownMode(other.to_owned())),
        }
    }
}

/// A concrete cipher + mode + strength combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Aes128Gcm,
    Aes192Gcm,
    Aes256Gcm,
    Aes128GcmSiv,
    Aes256GcmSiv,
}

impl Algorithm {
    /// Resolve the algorithm implied by `mode` and a key of `key_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeySize`] if the mode has no variant for
    /// that key length.
    pub fn resolve(mode: Mode, key_len: usize) -> Result<Self, CipherError> {
        match (mode, key_len) {
            (Mode::AesGcm, 16) => Ok(Algorithm::Aes128Gcm),
            (Mode::AesGcm, 24) => Ok(Algorithm::Aes192Gcm),
            (Mode::AesGcm, 32) => Ok(Algorithm::Aes256Gcm),
            (Mode::AesGcmSiv, 16) => Ok(Algorithm::Aes128GcmSiv),
            (Mode::AesGcmSiv, 32) => Ok(Algorithm::Aes256GcmSiv),
            _ => Err(CipherError::InvalidKeySize {
                mode,
                got: key_len,
                expected: mode.key_sizes(),
            }),
        }
    }

    pub fn mode(self) -> Mode {
        match self {
            Algorithm::Aes128Gcm | Algorithm::Aes192Gcm | Algorithm::Aes256Gcm => Mode::AesGcm,
            Algorithm::Aes128GcmSiv | Algorithm::Aes256GcmSiv => Mode::AesGcmSiv,
        }
    }

    /// Key length in bytes.
    pub fn key_len(self) -> usize {
        match self {
            Algorithm::Aes128Gcm | Algorithm::Aes128GcmSiv => 16,
            Algorithm::Aes192Gcm => 24,
            Algorithm::Aes256Gcm | Algorithm::Aes256GcmSiv => 32,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Aes128Gcm => "aes-128-gcm",
            Algorithm::Aes192Gcm => "aes-192-gcm",
            Algorithm::Aes256Gcm => "aes-256-gcm",
            Algorithm::Aes128GcmSiv => "aes-128-gcm-siv",
            Algorithm::Aes256GcmSiv => "aes-256-gcm-siv",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
