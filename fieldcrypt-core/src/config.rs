//! Credential registry configuration loader.
//!
//! The core trusts this module's output but does not depend on it — any
//! caller can build a [`CredentialRegistry`] purely in-process via
//! [`CredentialRegistry::builder`]. This is the concrete shape of an
//! external loader: a list of `{name, algorithm, keyMaterial base64,
//! ivSize}` records plus a designated default.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use serde::Deserialize;

use crate::algorithm::AlgorithmTag;
use crate::credential::{Credential, CredentialRegistry};
use crate::error::CoreError;

#[derive(Debug, Deserialize)]
pub struct CredentialRecord {
    pub name: Option<String>,
    pub algorithm: AlgorithmTag,
    pub key_material_base64: String,
    pub iv_size: usize,
}

#[derive(Debug, Deserialize)]
pub struct RegistryConfig {
    /// Name of the credential that should serve as the default.
    pub default: Option<String>,
    pub credentials: Vec<CredentialRecord>,
}

/// Parse and validate a [`RegistryConfig`] from JSON text, building a
/// [`CredentialRegistry`]. Fails eagerly (hard-fail at load, per the
/// recommended policy for algorithm/key-size mismatches) rather than lazily
/// at first use.
pub fn load_registry(json: &str) -> Result<CredentialRegistry, CoreError> {
    let config: RegistryConfig =
        serde_json::from_str(json).map_err(|e| CoreError::unknown_algorithm(format!("invalid config: {e}")))?;

    let mut builder = CredentialRegistry::builder();
    for record in config.credentials {
        let key_material = BASE64_STANDARD
            .decode(&record.key_material_base64)
            .map_err(|e| CoreError::unknown_algorithm(format!("invalid key_material_base64: {e}")))?;
        let is_default = config.default.as_deref() == record.name.as_deref() && record.name.is_some();
        let credential = Credential::new(record.name, record.algorithm, key_material, record.iv_size)?;
        builder = builder.add(credential, is_default)?;
    }

    tracing::info!("loaded credential registry from configuration");
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_valid_registry() {
        let key = BASE64_STANDARD.encode([0u8; 32]);
        let json = format!(
            r#"{{
                "default": "primary",
                "credentials": [
                    {{ "name": "primary", "algorithm": "Aes", "key_material_base64": "{key}", "iv_size": 16 }}
                ]
            }}"#
        );

        let registry = load_registry(&json).unwrap();
        assert!(registry.get(None).is_ok());
        assert!(registry.get(Some("primary")).is_ok());
    }

    #[test]
    fn rejects_bad_key_length() {
        let key = BASE64_STANDARD.encode([0u8; 5]);
        let json = format!(
            r#"{{
                "default": null,
                "credentials": [
                    {{ "name": "primary", "algorithm": "Aes", "key_material_base64": "{key}", "iv_size": 16 }}
                ]
            }}"#
        );
        assert!(load_registry(&json).is_err());
    }
}
