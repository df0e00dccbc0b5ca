//! # fieldcrypt-core
//!
//! Credential-keyed symmetric encryption: a named-credential registry, a
//! self-describing cipher-text envelope, and single-shot encrypt/decrypt
//! over bytes or UTF-8 strings.
//!
//! ## Quick start
//!
//! ```
//! use fieldcrypt_core::{AlgorithmTag, Credential, CredentialRegistry, Crypto};
//!
//! let registry = CredentialRegistry::builder()
//!     .add(Credential::new(Some("primary"), AlgorithmTag::Aes, vec![0u8; 32], 16).unwrap(), true)
//!     .unwrap()
//!     .build();
//!
//! let crypto = Crypto::new(registry);
//! let envelope = crypto.encrypt(b"secret", None).unwrap();
//! assert_eq!(crypto.decrypt(&envelope, None).unwrap(), b"secret");
//! ```
//!
//! ## What's NOT provided
//!
//! - Key management or key rotation — key material is supplied opaquely by
//!   the registry.
//! - Authenticated encryption beyond what the underlying block ciphers
//!   offer (CBC + PKCS#7, no AEAD tag).
//! - Streaming / chunked encryption.
//! - Cross-version cipher-text migration.

mod algorithm;
mod cipher;
pub mod config;
mod credential;
mod crypto;
mod envelope;
mod error;
mod facade;
pub mod global;
mod rng;

pub use algorithm::AlgorithmTag;
pub use credential::{Credential, CredentialRegistry, CredentialRegistryBuilder};
pub use crypto::{Decryptor, Encryptor};
pub use envelope::is_enveloped;
pub use error::CoreError;
pub use facade::Crypto;
