//! AES-GCM seal/open with a nonce-prefixed wire format.
//!
//! ```
//! use gencrypt::Galois;
//!
//! let gcm = Galois::new(b"12345678901234561234567890123456")?;
//! let sealed = gcm.seal(b"test data")?;
//! assert_eq!(sealed.len(), 12 + 9 + 16);
//! assert_eq!(gcm.open(&sealed)?, b"test data");
//! # Ok::<(), gencrypt::CipherError>(())
//! ```
//!
//! The cipher, the authenticated mode and the nonce source all come from
//! RustCrypto (`aes-gcm`, `aes-gcm-siv`, `OsRng`). This crate only fixes how
//! they are called and how the output is laid out.

pub mod algorithm;
pub mod armor;
pub mod cipher;
pub mod error;
pub mod key;

pub use algorithm::{Algorithm, Mode};
pub use cipher::{Galois, NONCE_LEN, TAG_LEN};
pub use error::CipherError;
pub use key::SecretKey;
