//! Error taxonomy for the cipher layer.

use thiserror::Error;

use crate::algorithm::Mode;

/// Errors produced by [`Galois`](crate::Galois) and its helpers.
///
/// None of the variants carry key material or plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// The key length is not one the selected mode accepts.
    #[error("invalid key size for {mode}: got {got} bytes, expected one of {expected:?}")]
    InvalidKeySize {
        /// Mode the key was offered to.
        mode: Mode,
        /// Length of the rejected key.
        got: usize,
        /// Key lengths the mode supports.
        expected: &'static [usize],
    },

    /// The underlying primitive rejected the key or configuration.
    #[error("cipher construction failed")]
    ConstructionFailure,

    /// The OS random source could not supply bytes.
    #[error("secure random source failed: {0}")]
    RandomSource(String),

    /// A sealed payload is too short to contain a nonce.
    #[error("malformed sealed payload: {len} bytes, need at least {min}")]
    MalformedInput {
        /// Length of the rejected payload.
        len: usize,
        /// Minimum acceptable length (the nonce size).
        min: usize,
    },

    /// Tag verification failed. Deliberately says nothing about why.
    #[error("authentication failed")]
    AuthenticationFailure,

    /// The mode refused to seal the plaintext (length limit exceeded).
    #[error("aead seal operation failed")]
    SealFailure,

    /// Armored text or an encoded key could not be parsed.
    #[error("invalid format: {0}")]
    InvalidFormat(&'static str),

    /// The mode identifier is not one of the supported modes.
    #[error("unknown mode: {0}")]
    UnknownMode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_key_size_names_mode_and_length() {
        let e = CipherError::InvalidKeySize {
            mode: Mode::AesGcm,
            got: 7,
            expected: Mode::AesGcm.key_sizes(),
        };
        let msg = e.to_string();
        assert!(msg.contains("aes-gcm"));
        assert!(msg.contains("got 7 bytes"));
    }

    #[test]
    fn authentication_failure_is_opaque() {
        assert_eq!(
            CipherError::AuthenticationFailure.to_string(),
            "authentication failed"
        );
    }
}
