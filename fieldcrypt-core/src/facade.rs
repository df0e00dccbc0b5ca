//! Crypto facade (C6)
//!
//! Top-level entry point: resolves a credential name to an
//! [`Encryptor`]/[`Decryptor`] and exposes one-shot convenience calls. Holds
//! only an `Arc`-shared, immutable registry, so it is cheap to clone and
//! safe to call from multiple workers concurrently — no cross-call state.

use std::sync::Arc;

use crate::credential::CredentialRegistry;
use crate::crypto::{Decryptor, Encryptor};
use crate::error::CoreError;

#[derive(Clone)]
pub struct Crypto {
    registry: Arc<CredentialRegistry>,
}

impl Crypto {
    pub fn new(registry: CredentialRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn from_shared(registry: Arc<CredentialRegistry>) -> Self {
        Self { registry }
    }

    pub fn get_encryptor(&self, credential_name: Option<&str>) -> Result<Encryptor, CoreError> {
        Ok(Encryptor::new(self.registry.get(credential_name)?.clone()))
    }

    pub fn get_decryptor(&self, credential_name: Option<&str>) -> Result<Decryptor, CoreError> {
        Ok(Decryptor::new(self.registry.get(credential_name)?.clone()))
    }

    pub fn can_encrypt(&self, credential_name: Option<&str>) -> bool {
        self.registry.can_encrypt(credential_name)
    }

    pub fn can_decrypt(&self, credential_name: Option<&str>) -> bool {
        self.registry.can_decrypt(credential_name)
    }

    /// One-shot convenience equivalent to `get_encryptor(name).encrypt_bytes(payload)`.
    pub fn encrypt(&self, payload: &[u8], credential_name: Option<&str>) -> Result<Vec<u8>, CoreError> {
        self.get_encryptor(credential_name)?.encrypt_bytes(payload)
    }

    /// One-shot convenience equivalent to `get_decryptor(name).decrypt_bytes(payload)`.
    pub fn decrypt(&self, payload: &[u8], credential_name: Option<&str>) -> Result<Vec<u8>, CoreError> {
        self.get_decryptor(credential_name)?.decrypt_bytes(payload)
    }

    pub fn encrypt_string(&self, payload: &str, credential_name: Option<&str>) -> Result<String, CoreError> {
        self.get_encryptor(credential_name)?.encrypt_string(payload)
    }

    pub fn decrypt_string(&self, payload: &str, credential_name: Option<&str>) -> Result<String, CoreError> {
        self.get_decryptor(credential_name)?.decrypt_string(payload)
    }
}
