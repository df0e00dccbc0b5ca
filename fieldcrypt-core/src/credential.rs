//! Credential and credential registry (C4)

use std::collections::HashMap;

use zeroize::Zeroizing;

use crate::algorithm::AlgorithmTag;
use crate::error::CoreError;

/// A named pairing of key material with an algorithm tag. `name` is a
/// caller-visible label — it is neither the key nor a secret.
#[derive(Clone)]
pub struct Credential {
    name: Option<String>,
    algorithm: AlgorithmTag,
    key_material: Zeroizing<Vec<u8>>,
    iv_size: usize,
}

impl Credential {
    /// Build a credential, validating that `key_material`'s length is a
    /// valid key length for `algorithm`.
    pub fn new(
        name: Option<impl Into<String>>,
        algorithm: AlgorithmTag,
        key_material: Vec<u8>,
        iv_size: usize,
    ) -> Result<Self, CoreError> {
        if !algorithm.is_valid_key_size(key_material.len()) {
            return Err(CoreError::unknown_algorithm(format!(
                "{algorithm} requires a key of length {:?}, got {}",
                algorithm.valid_key_sizes(),
                key_material.len()
            )));
        }
        if iv_size != algorithm.iv_size() {
            return Err(CoreError::unknown_algorithm(format!(
                "{algorithm} requires iv_size {}, got {}",
                algorithm.iv_size(),
                iv_size
            )));
        }
        Ok(Self {
            name: name.map(Into::into),
            algorithm,
            key_material: Zeroizing::new(key_material),
            iv_size,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn algorithm(&self) -> AlgorithmTag {
        self.algorithm
    }

    pub fn key_material(&self) -> &[u8] {
        &self.key_material
    }

    pub fn iv_size(&self) -> usize {
        self.iv_size
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("name", &self.name)
            .field("algorithm", &self.algorithm)
            .field("iv_size", &self.iv_size)
            .field("key_material", &"<redacted>")
            .finish()
    }
}

/// Immutable-after-build mapping from credential name to [`Credential`].
/// Built once at startup; readable by any worker without locking.
#[derive(Debug, Default)]
pub struct CredentialRegistry {
    by_name: HashMap<String, Credential>,
    default: Option<Credential>,
}

impl CredentialRegistry {
    pub fn builder() -> CredentialRegistryBuilder {
        CredentialRegistryBuilder::default()
    }

    /// Resolve `name` (or the default, if `name` is `None`) to a credential.
    pub fn get(&self, name: Option<&str>) -> Result<&Credential, CoreError> {
        match name {
            None => self.default.as_ref().ok_or_else(|| CoreError::CredentialNotFound {
                name: "<default>".into(),
            }),
            Some(name) => self.by_name.get(name).ok_or_else(|| CoreError::CredentialNotFound {
                name: name.to_string(),
            }),
        }
    }

    /// True iff `get(name)` would succeed. Today equivalent to
    /// [`Self::can_decrypt`]; the split exists so future registries may
    /// authorize operations asymmetrically.
    pub fn can_encrypt(&self, name: Option<&str>) -> bool {
        self.get(name).is_ok()
    }

    pub fn can_decrypt(&self, name: Option<&str>) -> bool {
        self.get(name).is_ok()
    }
}

/// Builder enforcing "at most one default, unique case-sensitive names"
/// before a [`CredentialRegistry`] is ever handed out.
#[derive(Default)]
pub struct CredentialRegistryBuilder {
    by_name: HashMap<String, Credential>,
    default: Option<Credential>,
    default_name: Option<String>,
}

impl CredentialRegistryBuilder {
    /// Register `credential` under its own name, and as the default if
    /// `is_default` is set. Fails if a default is already registered, or if
    /// a named credential with the same name already exists.
    pub fn add(mut self, credential: Credential, is_default: bool) -> Result<Self, CoreError> {
        if is_default {
            if self.default.is_some() {
                return Err(CoreError::unknown_algorithm(format!(
                    "duplicate default credential: {:?} conflicts with existing default {:?}",
                    credential.name(),
                    self.default_name
                )));
            }
            self.default_name = credential.name().map(ToString::to_string);
            self.default = Some(credential.clone());
        }
        if let Some(name) = credential.name() {
            if self.by_name.contains_key(name) {
                return Err(CoreError::unknown_algorithm(format!(
                    "duplicate credential name: {name}"
                )));
            }
            self.by_name.insert(name.to_string(), credential);
        }
        Ok(self)
    }

    pub fn build(self) -> CredentialRegistry {
        CredentialRegistry {
            by_name: self.by_name,
            default: self.default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aes_credential(name: &str) -> Credential {
        Credential::new(Some(name), AlgorithmTag::Aes, vec![0u8; 32], 16).unwrap()
    }

    #[test]
    fn rejects_invalid_key_length() {
        let err = Credential::new(Some("bad"), AlgorithmTag::Aes, vec![0u8; 11], 16).unwrap_err();
        assert!(matches!(err, CoreError::UnknownAlgorithm { .. }));
    }

    #[test]
    fn default_lookup_and_named_lookup() {
        let registry = CredentialRegistry::builder()
            .add(aes_credential("primary"), true)
            .unwrap()
            .add(aes_credential("secondary"), false)
            .unwrap()
            .build();

        assert_eq!(registry.get(None).unwrap().name(), Some("primary"));
        assert_eq!(registry.get(Some("secondary")).unwrap().name(), Some("secondary"));
        assert!(registry.get(Some("missing")).is_err());
    }

    #[test]
    fn rejects_second_default() {
        let result = CredentialRegistry::builder()
            .add(aes_credential("a"), true)
            .unwrap()
            .add(aes_credential("b"), true);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_duplicate_name() {
        let result = CredentialRegistry::builder()
            .add(aes_credential("a"), false)
            .unwrap()
            .add(aes_credential("a"), false);
        assert!(result.is_err());
    }
}
