//! Encryptor / Decryptor (C5)
//!
//! Per-credential handles that perform single-shot encrypt/decrypt over
//! bytes or text. Safe to reuse across calls; hold no state between calls.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};

use crate::cipher;
use crate::credential::Credential;
use crate::envelope;
use crate::error::CoreError;
use crate::rng;

/// Bound to a single credential; encrypts bytes or UTF-8 strings into
/// self-describing envelopes.
#[derive(Clone)]
pub struct Encryptor {
    credential: Credential,
}

impl Encryptor {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Encrypt `plain` into a versioned envelope carrying a fresh IV.
    pub fn encrypt_bytes(&self, plain: &[u8]) -> Result<Vec<u8>, CoreError> {
        let iv = rng::bytes(self.credential.iv_size());
        let ciphertext = cipher::encrypt(self.credential.algorithm(), self.credential.key_material(), &iv, plain)?;

        tracing::debug!(
            credential = self.credential.name().unwrap_or("<default>"),
            algorithm = %self.credential.algorithm(),
            plain_len = plain.len(),
            "encrypted payload"
        );

        let mut sink = Vec::with_capacity(3 + iv.len() + ciphertext.len());
        envelope::write_header(&mut sink, &iv);
        sink.extend_from_slice(&ciphertext);
        Ok(sink)
    }

    /// Encode `plain` as UTF-8, encrypt, and Base64-encode the envelope.
    pub fn encrypt_string(&self, plain: &str) -> Result<String, CoreError> {
        let envelope = self.encrypt_bytes(plain.as_bytes())?;
        Ok(BASE64_STANDARD.encode(envelope))
    }
}

/// Bound to a single credential; decrypts envelopes produced by an
/// [`Encryptor`] for the same credential.
#[derive(Clone)]
pub struct Decryptor {
    credential: Credential,
}

impl Decryptor {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Decrypt a versioned envelope back into plaintext bytes.
    pub fn decrypt_bytes(&self, envelope: &[u8]) -> Result<Vec<u8>, CoreError> {
        let header = envelope::read_header(envelope)?;
        let plain = cipher::decrypt(
            self.credential.algorithm(),
            self.credential.key_material(),
            header.iv,
            header.ciphertext,
        )?;

        tracing::debug!(
            credential = self.credential.name().unwrap_or("<default>"),
            algorithm = %self.credential.algorithm(),
            plain_len = plain.len(),
            "decrypted payload"
        );

        Ok(plain)
    }

    /// Base64-decode `s`, decrypt, and decode the result as UTF-8.
    pub fn decrypt_string(&self, s: &str) -> Result<String, CoreError> {
        let envelope = BASE64_STANDARD
            .decode(s)
            .map_err(|e| CoreError::cipher_error(format!("invalid base64: {e}")))?;
        let plain = self.decrypt_bytes(&envelope)?;
        String::from_utf8(plain).map_err(|e| CoreError::cipher_error(format!("invalid utf-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::AlgorithmTag;

    fn aes_credential() -> Credential {
        Credential::new(Some("test"), AlgorithmTag::Aes, vec![0u8; 32], 16).unwrap()
    }

    #[test]
    fn byte_round_trip() {
        let encryptor = Encryptor::new(aes_credential());
        let decryptor = Decryptor::new(aes_credential());

        let plain = [0x00, 0x01, 0x02, 0x03];
        let envelope = encryptor.encrypt_bytes(&plain).unwrap();

        assert_eq!(envelope[0], 0x01);
        assert_eq!(u16::from_le_bytes([envelope[1], envelope[2]]), 16);

        let recovered = decryptor.decrypt_bytes(&envelope).unwrap();
        assert_eq!(recovered, plain);
    }

    #[test]
    fn string_round_trip() {
        let encryptor = Encryptor::new(aes_credential());
        let decryptor = Decryptor::new(aes_credential());

        let s = "héllo, wörld";
        let ciphertext = encryptor.encrypt_string(s).unwrap();
        assert_eq!(decryptor.decrypt_string(&ciphertext).unwrap(), s);
    }

    #[test]
    fn iv_and_ciphertext_vary_between_calls() {
        let encryptor = Encryptor::new(aes_credential());
        let a = encryptor.encrypt_bytes(b"same plaintext").unwrap();
        let b = encryptor.encrypt_bytes(b"same plaintext").unwrap();
        assert_ne!(a, b);
        assert!(envelope::is_enveloped(&a));
        assert!(envelope::is_enveloped(&b));
    }

    #[test]
    fn bad_version_byte_fails() {
        let decryptor = Decryptor::new(aes_credential());
        let bytes = [0x02u8, 16, 0];
        let err = decryptor.decrypt_bytes(&bytes).unwrap_err();
        assert_eq!(err, CoreError::UnsupportedProtocol { version: 2 });
    }
}
