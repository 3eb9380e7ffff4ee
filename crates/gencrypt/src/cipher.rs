//! [`Galois`]: an authenticated-encryption handle bound to one key.
//!
//! # Wire format
//!
//! ```text
//! nonce (12 bytes) || ciphertext || tag (16 bytes)
//! ```
//!
//! There is no header, version byte or algorithm identifier. Both sides must
//! agree on mode and key out of band.
//!
//! **Every seal draws a fresh random nonce.** GCM nonce reuse under one key
//! breaks both confidentiality and authentication, so nonces are never cached
//! or derived from a counter here.

use aes_gcm::{
    aead::{
        consts::U12, generic_array::typenum::Unsigned, rand_core::RngCore, Aead, AeadCore,
        KeyInit, Nonce, OsRng, Payload,
    },
    aes::Aes192,
    Aes128Gcm, Aes256Gcm, AesGcm,
};
use aes_gcm_siv::{Aes128GcmSiv, Aes256GcmSiv};
use tracing::debug;

use crate::algorithm::{Algorithm, Mode};
use crate::error::CipherError;
use crate::key;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Byte length of the nonce prefix (96 bits) for every supported algorithm.
pub const NONCE_LEN: usize = 12;

/// Byte length of the authentication tag (128 bits) for every supported algorithm.
pub const TAG_LEN: usize = 16;

/// Keyed mode instance, one variant per [`Algorithm`].
enum Engine {
    Aes128Gcm(Aes128Gcm),
    Aes192Gcm(Aes192Gcm),
    Aes256Gcm(Aes256Gcm),
    Aes128GcmSiv(Aes128GcmSiv),
    Aes256GcmSiv(Aes256GcmSiv),
}

/// Seals and opens byte payloads under a single key.
///
/// The handle holds no mutable state after construction, so it is `Send +
/// Sync` and can be shared across threads behind a plain reference or an
/// `Arc`.
pub struct Galois {
    engine: Engine,
    algorithm: Algorithm,
    key_id: String,
}

impl Galois {
    /// Build an AES-GCM handle. A 32-byte key selects AES-256; 16- and 24-byte
    /// keys select AES-128 and AES-192.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeySize`] for any other key length and
    /// [`CipherError::ConstructionFailure`] if the primitive rejects the key.
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        Self::with_mode(Mode::AesGcm, key)
    }

    /// Build a handle for an explicit [`Mode`].
    ///
    /// # Errors
    ///
    /// Same as [`Galois::new`], checked against `mode`'s key sizes.
    pub fn with_mode(mode: Mode, key: &[u8]) -> Result<Self, CipherError> {
        let algorithm = Algorithm::resolve(mode, key.len())?;
        let engine = match algorithm {
            Algorithm::Aes128Gcm => Engine::Aes128Gcm(build(key)?),
            Algorithm::Aes192Gcm => Engine::Aes192Gcm(build(key)?),
            Algorithm::Aes256Gcm => Engine::Aes256Gcm(build(key)?),
            Algorithm::Aes128GcmSiv => Engine::Aes128GcmSiv(build(key)?),
            Algorithm::Aes256GcmSiv => Engine::Aes256GcmSiv(build(key)?),
        };
        let key_id = key::key_id(key)?;

        debug!(algorithm = %algorithm, key_id = %key_id, "cipher handle constructed");
        Ok(Self {
            engine,
            algorithm,
            key_id,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Non-secret fingerprint of the key this handle was built from.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Nonce length in bytes, as reported by the mode.
    pub fn nonce_size(&self) -> usize {
        match &self.engine {
            Engine::Aes128Gcm(_) => nonce_size::<Aes128Gcm>(),
            Engine::Aes192Gcm(_) => nonce_size::<Aes192Gcm>(),
            Engine::Aes256Gcm(_) => nonce_size::<Aes256Gcm>(),
            Engine::Aes128GcmSiv(_) => nonce_size::<Aes128GcmSiv>(),
            Engine::Aes256GcmSiv(_) => nonce_size::<Aes256GcmSiv>(),
        }
    }

    /// Bytes the mode adds to every ciphertext (the tag), as reported by the mode.
    pub fn overhead(&self) -> usize {
        match &self.engine {
            Engine::Aes128Gcm(_) => tag_size::<Aes128Gcm>(),
            Engine::Aes192Gcm(_) => tag_size::<Aes192Gcm>(),
            Engine::Aes256Gcm(_) => tag_size::<Aes256Gcm>(),
            Engine::Aes128GcmSiv(_) => tag_size::<Aes128GcmSiv>(),
            Engine::Aes256GcmSiv(_) => tag_size::<Aes256GcmSiv>(),
        }
    }

    /// Encrypt and authenticate `plaintext` with empty associated data.
    ///
    /// Returns `nonce || ciphertext || tag`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::RandomSource`] if no nonce can be drawn and
    /// [`CipherError::SealFailure`] if the mode refuses the plaintext.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.seal_with_aad(plaintext, &[])
    }

    /// Like [`Galois::seal`], additionally authenticating `aad`. The associated
    /// data is not included in the output; the same bytes must be supplied to
    /// [`Galois::open_with_aad`].
    pub fn seal_with_aad(&self, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, CipherError> {
        let nonce_len = self.nonce_size();
        let mut sealed = Vec::with_capacity(nonce_len + plaintext.len() + self.overhead());
        sealed.resize(nonce_len, 0);
        OsRng
            .try_fill_bytes(&mut sealed)
            .map_err(|e| CipherError::RandomSource(e.to_string()))?;

        let payload = Payload {
            msg: plaintext,
            aad,
        };
        let ciphertext = match &self.engine {
            Engine::Aes128Gcm(c) => encrypt(c, &sealed, payload),
            Engine::Aes192Gcm(c) => encrypt(c, &sealed, payload),
            Engine::Aes256Gcm(c) => encrypt(c, &sealed, payload),
            Engine::Aes128GcmSiv(c) => encrypt(c, &sealed, payload),
            Engine::Aes256GcmSiv(c) => encrypt(c, &sealed, payload),
        }
        .map_err(|_| CipherError::SealFailure)?;

        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Verify and decrypt a payload produced by [`Galois::seal`].
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedInput`] if `sealed` is shorter than the
    /// nonce and [`CipherError::AuthenticationFailure`] if the tag does not
    /// verify. No plaintext is returned on failure.
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.open_with_aad(sealed, &[])
    }

    /// Like [`Galois::open`], verifying `aad` as associated data.
    pub fn open_with_aad(&self, sealed: &[u8], aad: &[u8]) -> Result<Vec<u8>, CipherError> {
        let nonce_len = self.nonce_size();
        if sealed.len() < nonce_len {
            return Err(CipherError::MalformedInput {
                len: sealed.len(),
                min: nonce_len,
            });
        }
        let (nonce, ciphertext) = sealed.split_at(nonce_len);

        let payload = Payload {
            msg: ciphertext,
            aad,
        };
        match &self.engine {
            Engine::Aes128Gcm(c) => decrypt(c, nonce, payload),
            Engine::Aes192Gcm(c) => decrypt(c, nonce, payload),
            Engine::Aes256Gcm(c) => decrypt(c, nonce, payload),
            Engine::Aes128GcmSiv(c) => decrypt(c, nonce, payload),
            Engine::Aes256GcmSiv(c) => decrypt(c, nonce, payload),
        }
        .map_err(|_| CipherError::AuthenticationFailure)
    }
}

impl std::fmt::Debug for Galois {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Galois")
            .field("algorithm", &self.algorithm)
            .field("key_id", &self.key_id)
            .finish()
    }
}

fn build<A: KeyInit>(key: &[u8]) -> Result<A, CipherError> {
    A::new_from_slice(key).map_err(|_| CipherError::ConstructionFailure)
}

fn nonce_size<A: AeadCore>() -> usize {
    A::NonceSize::USIZE
}

fn tag_size<A: AeadCore>() -> usize {
    A::TagSize::USIZE
}

fn encrypt<A: Aead>(
    cipher: &A,
    nonce: &[u8],
    payload: Payload<'_, '_>,
) -> Result<Vec<u8>, aes_gcm::Error> {
    cipher.encrypt(Nonce::<A>::from_slice(nonce), payload)
}

fn decrypt<A: Aead>(
    cipher: &A,
    nonce: &[u8],
    payload: Payload<'_, '_>,
) -> Result<Vec<u8>, aes_gcm::Error> {
    cipher.decrypt(Nonce::<A>::from_slice(nonce), payload)
}
