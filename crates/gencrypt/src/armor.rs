//! Text form of a sealed payload, for transports that cannot carry raw bytes.
//!
//! ```text
//! v1.<base64url-no-pad(nonce)>.<base64url-no-pad(ciphertext+tag)>
//! ```
//!
//! Decoding yields the exact contiguous `nonce || ciphertext || tag` bytes that
//! [`Galois::open`](crate::Galois::open) expects.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::error::CipherError;

/// Prefix that appears at the start of every armored payload.
pub const VERSION_PREFIX: &str = "v1";

/// Armor a sealed payload whose nonce is `nonce_size` bytes long.
///
/// # Errors
///
/// Returns [`CipherError::MalformedInput`] if `sealed` is shorter than the nonce.
pub fn encode(sealed: &[u8], nonce_size: usize) -> Result<String, CipherError> {
    if sealed.len() < nonce_size {
        return Err(CipherError::MalformedInput {
            len: sealed.len(),
            min: nonce_size,
        });
    }
    let (nonce, ciphertext) = sealed.split_at(nonce_size);
    Ok(format!(
        "{}.{}.{}",
        VERSION_PREFIX,
        URL_SAFE_NO_PAD.encode(nonce),
        URL_SAFE_NO_PAD.encode(ciphertext),
    ))
}

/// Parse an armored payload back into sealed bytes.
///
/// # Errors
///
/// Returns [`CipherError::InvalidFormat`] if the text does not match the
/// `v1.<nonce>.<ciphertext>` structure or the nonce is not `nonce_size` bytes.
pub fn decode(text: &str, nonce_size: usize) -> Result<Vec<u8>, CipherError> {
    let parts: Vec<&str> = text.trim().splitn(3, '.').collect();
    if parts.len() != 3 || parts[0] != VERSION_PREFIX {
        return Err(CipherError::InvalidFormat(
            "expected v1.<nonce>.<ciphertext>",
        ));
    }

    let mut sealed = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|_| CipherError::InvalidFormat("nonce is not valid base64url"))?;
    if sealed.len() != nonce_size {
        return Err(CipherError::InvalidFormat("nonce has the wrong length"));
    }

    let ciphertext = URL_SAFE_NO_PAD
        .decode(parts[2])
        .map_err(|_| CipherError::InvalidFormat("ciphertext is not valid base64url"))?;
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Galois, NONCE_LEN};

    #[test]
    fn armored_payload_opens() {
        let gcm = Galois::new(&[0x42u8; 32]).unwrap();
        let sealed = gcm.seal(b"hello").unwrap();
        let text = encode(&sealed, gcm.nonce_size()).unwrap();
        assert!(text.starts_with("v1."));
        let decoded = decode(&text, gcm.nonce_size()).unwrap();
        assert_eq!(decoded, sealed);
        assert_eq!(gcm.open(&decoded).unwrap(), b"hello");
    }

    #[test]
    fn encode_rejects_short_payload() {
        assert!(matches!(
            encode(&[0u8; 3], NONCE_LEN),
            Err(CipherError::MalformedInput { len: 3, min: 12 })
        ));
    }

    #[test]
    fn rejects_bad_prefix() {
        assert!(decode("v2.abc.def", NONCE_LEN).is_err());
    }

    #[test]
    fn rejects_too_few_parts() {
        assert!(decode("v1.abc", NONCE_LEN).is_err());
    }

    #[test]
    fn rejects_bad_base64() {
        assert!(decode("v1.!!!.abc", NONCE_LEN).is_err());
    }

    #[test]
    fn rejects_wrong_nonce_length() {
        let short = URL_SAFE_NO_PAD.encode([0u8; 8]);
        let err = decode(&format!("v1.{short}.AAAA"), NONCE_LEN).unwrap_err();
        assert_eq!(err, CipherError::InvalidFormat("nonce has the wrong length"));
    }

    #[test]
    fn extra_dot_in_ciphertext_rejected() {
        let nonce = URL_SAFE_NO_PAD.encode([0u8; NONCE_LEN]);
        assert!(decode(&format!("v1.{nonce}.AAAA.BBBB"), NONCE_LEN).is_err());
    }
}
