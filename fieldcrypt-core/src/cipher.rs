//! Symmetric primitive adapter (C2)
//!
//! Maps an [`AlgorithmTag`] plus a concrete key length to a CBC-mode block
//! cipher with PKCS#7 padding, the same `cipher`-crate shape the pack's
//! `connorskees-pdf` encryption module uses for its legacy AES-CBC streams
//! (`cbc::Decryptor<aes::Aes128>` + `block_padding::Pkcs7`).
//!
//! There is no single boxed "cipher object" type here: each backing block
//! cipher has a different block size at the type level, so `encrypt`/
//! `decrypt` dispatch on `(algorithm, key.len())` internally rather than
//! returning a trait object.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use des::{Des, TdesEde2, TdesEde3};
use rc2::Rc2;

use crate::algorithm::AlgorithmTag;
use crate::error::CoreError;

macro_rules! cbc_encrypt {
    ($cipher:ty, $key:expr, $iv:expr, $plain:expr) => {{
        let encryptor = <cbc::Encryptor<$cipher>>::new_from_slices($key, $iv)
            .map_err(|e| CoreError::cipher_error(format!("bad key/iv length: {e}")))?;
        Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>($plain))
    }};
}

macro_rules! cbc_decrypt {
    ($cipher:ty, $key:expr, $iv:expr, $ct:expr) => {{
        let decryptor = <cbc::Decryptor<$cipher>>::new_from_slices($key, $iv)
            .map_err(|e| CoreError::cipher_error(format!("bad key/iv length: {e}")))?;
        decryptor
            .decrypt_padded_vec_mut::<Pkcs7>($ct)
            .map_err(|e| CoreError::cipher_error(format!("padding/alignment error: {e}")))
    }};
}

/// Encrypt `plain` under `algorithm` with `key` and `iv`, CBC mode, PKCS#7
/// padding. Fails with [`CoreError::UnknownAlgorithm`] if `key.len()` is
/// not a valid size for `algorithm` (the registry is expected to have
/// already validated this at load time; this is a last-line guard).
pub fn encrypt(algorithm: AlgorithmTag, key: &[u8], iv: &[u8], plain: &[u8]) -> Result<Vec<u8>, CoreError> {
    match (algorithm, key.len()) {
        (AlgorithmTag::Aes, 16) | (AlgorithmTag::Rijndael, 16) => cbc_encrypt!(Aes128, key, iv, plain),
        (AlgorithmTag::Aes, 24) | (AlgorithmTag::Rijndael, 24) => cbc_encrypt!(Aes192, key, iv, plain),
        (AlgorithmTag::Aes, 32) | (AlgorithmTag::Rijndael, 32) => cbc_encrypt!(Aes256, key, iv, plain),
        (AlgorithmTag::Des, 8) => cbc_encrypt!(Des, key, iv, plain),
        (AlgorithmTag::TripleDes, 16) => cbc_encrypt!(TdesEde2, key, iv, plain),
        (AlgorithmTag::TripleDes, 24) => cbc_encrypt!(TdesEde3, key, iv, plain),
        (AlgorithmTag::Rc2, 8) => cbc_encrypt!(Rc2, key, iv, plain),
        (algorithm, len) => Err(CoreError::unknown_algorithm(format!(
            "{algorithm} has no {len}-byte key configuration; valid sizes are {:?}",
            algorithm.valid_key_sizes()
        ))),
    }
}

/// Decrypt `ciphertext` under `algorithm` with `key` and `iv`.
pub fn decrypt(algorithm: AlgorithmTag, key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CoreError> {
    match (algorithm, key.len()) {
        (AlgorithmTag::Aes, 16) | (AlgorithmTag::Rijndael, 16) => cbc_decrypt!(Aes128, key, iv, ciphertext),
        (AlgorithmTag::Aes, 24) | (AlgorithmTag::Rijndael, 24) => cbc_decrypt!(Aes192, key, iv, ciphertext),
        (AlgorithmTag::Aes, 32) | (AlgorithmTag::Rijndael, 32) => cbc_decrypt!(Aes256, key, iv, ciphertext),
        (AlgorithmTag::Des, 8) => cbc_decrypt!(Des, key, iv, ciphertext),
        (AlgorithmTag::TripleDes, 16) => cbc_decrypt!(TdesEde2, key, iv, ciphertext),
        (AlgorithmTag::TripleDes, 24) => cbc_decrypt!(TdesEde3, key, iv, ciphertext),
        (AlgorithmTag::Rc2, 8) => cbc_decrypt!(Rc2, key, iv, ciphertext),
        (algorithm, len) => Err(CoreError::unknown_algorithm(format!(
            "{algorithm} has no {len}-byte key configuration; valid sizes are {:?}",
            algorithm.valid_key_sizes()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aes256_round_trips() {
        let key = [0u8; 32];
        let iv = [0u8; 16];
        let plain = b"the quick brown fox";
        let ct = encrypt(AlgorithmTag::Aes, &key, &iv, plain).unwrap();
        let pt = decrypt(AlgorithmTag::Aes, &key, &iv, &ct).unwrap();
        assert_eq!(pt, plain);
    }

    #[test]
    fn des_round_trips() {
        let key = [1u8; 8];
        let iv = [2u8; 8];
        let plain = b"tiny msg";
        let ct = encrypt(AlgorithmTag::Des, &key, &iv, plain).unwrap();
        let pt = decrypt(AlgorithmTag::Des, &key, &iv, &ct).unwrap();
        assert_eq!(pt, plain);
    }

    #[test]
    fn unknown_key_length_is_rejected() {
        let key = [0u8; 11];
        let iv = [0u8; 16];
        let err = encrypt(AlgorithmTag::Aes, &key, &iv, b"x").unwrap_err();
        assert!(matches!(err, CoreError::UnknownAlgorithm { .. }));
    }
}
