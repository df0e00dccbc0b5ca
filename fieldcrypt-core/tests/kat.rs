//! Known-answer style end-to-end tests for the envelope codec and facade.

use fieldcrypt_core::{AlgorithmTag, Credential, CredentialRegistry, Crypto};

fn crypto_with_aes256_zero_key() -> Crypto {
    let registry = CredentialRegistry::builder()
        .add(
            Credential::new(Some("primary"), AlgorithmTag::Aes, vec![0u8; 32], 16).unwrap(),
            true,
        )
        .unwrap()
        .build();
    Crypto::new(registry)
}

/// Credential: AES/256, key material all zeros, ivSize=16.
#[test]
fn byte_round_trip_sets_version_and_iv_length() {
    let crypto = crypto_with_aes256_zero_key();
    let p = [0x00u8, 0x01, 0x02, 0x03];

    let envelope = crypto.encrypt(&p, None).unwrap();
    assert_eq!(envelope[0], 0x01);
    let iv_len = envelope[1] as u16 | ((envelope[2] as u16) << 8);
    assert_eq!(iv_len, 16);

    let recovered = crypto.decrypt(&envelope, None).unwrap();
    assert_eq!(recovered, p);
}

/// Feeding a byte sequence whose first byte is 0x02 into `decrypt` is
/// rejected as an unsupported protocol version.
#[test]
fn version_mismatch_is_rejected() {
    let crypto = crypto_with_aes256_zero_key();
    let bogus = [0x02u8, 16, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
    let err = crypto.decrypt(&bogus, None).unwrap_err();
    assert_eq!(err, fieldcrypt_core::CoreError::UnsupportedProtocol { version: 0x02 });
}
