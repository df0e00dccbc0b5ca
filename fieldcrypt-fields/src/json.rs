//! JSON field-level engine: walks a document by JSONPath expressions and
//! rewrites matched tokens through a credential's encryptor/decryptor.
//!
//! Built on `serde_json::Value` as the token tree and `jsonpath_lib` for
//! JSONPath evaluation and in-place replacement — its `replace_with` entry
//! point matches the "collect an eager snapshot, then splice" algorithm the
//! design calls for, including the root-match special case.

use fieldcrypt_core::Crypto;
use serde_json::Value;

use crate::error::FieldError;

/// Encrypt every token matched by `paths`, in order, under `credential_name`.
pub fn encrypt_json(
    document_json: &str,
    paths: &[Option<&str>],
    credential_name: Option<&str>,
    crypto: &Crypto,
) -> Result<String, FieldError> {
    if paths.is_empty() {
        return Err(FieldError::NoPaths);
    }

    let mut value: Value = serde_json::from_str(document_json).map_err(|e| FieldError::parse(e.to_string()))?;
    let mut encryptor = None;

    for (index, path) in paths.iter().enumerate() {
        let expr = path.filter(|p| !p.is_empty()).ok_or(FieldError::InvalidPath { index })?;

        if jsonpath_lib::select(&value, expr).map(|m| m.is_empty()).unwrap_or(true) {
            continue;
        }
        if encryptor.is_none() {
            encryptor = Some(crypto.get_encryptor(credential_name).map_err(|e| FieldError::crypto(expr, 0, e))?);
        }
        let encryptor = encryptor.as_ref().expect("just initialized above");

        let mut match_index = 0usize;
        let mut first_error: Option<FieldError> = None;

        value = jsonpath_lib::replace_with(value, expr, &mut |matched| {
            if first_error.is_some() {
                return Some(matched);
            }
            let minified = serde_json::to_string(&matched).unwrap_or_default();

            tracing::debug!(path = expr, match_index, "encrypting json field");

            match encryptor.encrypt_string(&minified) {
                Ok(ciphertext) => {
                    match_index += 1;
                    Some(Value::String(ciphertext))
                }
                Err(e) => {
                    first_error = Some(FieldError::crypto(expr, match_index, e));
                    match_index += 1;
                    Some(matched)
                }
            }
        })
        .map_err(|e| FieldError::parse(e.to_string()))?;

        if let Some(e) = first_error {
            return Err(e);
        }
    }

    serde_json::to_string(&value).map_err(|e| FieldError::parse(e.to_string()))
}

/// Decrypt every token matched by `paths`, symmetric to [`encrypt_json`].
///
/// When a match is the document root, the decrypted token becomes the new
/// root and subsequent path expressions in the same call are evaluated
/// against it.
pub fn decrypt_json(
    document_json: &str,
    paths: &[Option<&str>],
    credential_name: Option<&str>,
    crypto: &Crypto,
) -> Result<String, FieldError> {
    if paths.is_empty() {
        return Err(FieldError::NoPaths);
    }

    let mut value: Value = serde_json::from_str(document_json).map_err(|e| FieldError::parse(e.to_string()))?;
    let mut decryptor = None;

    for (index, path) in paths.iter().enumerate() {
        let expr = path.filter(|p| !p.is_empty()).ok_or(FieldError::InvalidPath { index })?;

        if jsonpath_lib::select(&value, expr).map(|m| m.is_empty()).unwrap_or(true) {
            continue;
        }
        if decryptor.is_none() {
            decryptor = Some(crypto.get_decryptor(credential_name).map_err(|e| FieldError::crypto(expr, 0, e))?);
        }
        let decryptor = decryptor.as_ref().expect("just initialized above");

        let mut match_index = 0usize;
        let mut first_error: Option<FieldError> = None;

        value = jsonpath_lib::replace_with(value, expr, &mut |matched| {
            if first_error.is_some() {
                return Some(matched);
            }
            let current_index = match_index;
            match_index += 1;

            let raw = match &matched {
                Value::String(s) => s.clone(),
                // Not a previously-encrypted field; leave as-is.
                _ => return Some(matched),
            };

            tracing::debug!(path = expr, match_index = current_index, "decrypting json field");

            match decryptor.decrypt_string(&raw) {
                Ok(decrypted) if decrypted == raw => Some(matched),
                Ok(decrypted) => match serde_json::from_str::<Value>(&decrypted) {
                    Ok(token) => Some(token),
                    Err(e) => {
                        first_error = Some(FieldError::parse(format!(
                            "decrypted value at match {current_index} of path '{expr}' is not valid JSON: {e}"
                        )));
                        Some(matched)
                    }
                },
                Err(e) => {
                    first_error = Some(FieldError::crypto(expr, current_index, e));
                    Some(matched)
                }
            }
        })
        .map_err(|e| FieldError::parse(e.to_string()))?;

        if let Some(e) = first_error {
            return Err(e);
        }
    }

    serde_json::to_string(&value).map_err(|e| FieldError::parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldcrypt_core::{AlgorithmTag, Credential, CredentialRegistry};

    fn crypto() -> Crypto {
        let registry = CredentialRegistry::builder()
            .add(
                Credential::new(Some("c"), AlgorithmTag::Aes, vec![6u8; 32], 16).unwrap(),
                true,
            )
            .unwrap()
            .build();
        Crypto::new(registry)
    }

    #[test]
    fn json_field_round_trip_preserves_type() {
        let crypto = crypto();
        let doc = r#"{"x": 42, "y": "keep"}"#;
        let paths = [Some("$.x")];

        let encrypted = encrypt_json(doc, &paths, None, &crypto).unwrap();
        let parsed: Value = serde_json::from_str(&encrypted).unwrap();
        assert!(parsed["x"].is_string());
        assert_eq!(parsed["y"], Value::String("keep".into()));

        let decrypted = decrypt_json(&encrypted, &paths, None, &crypto).unwrap();
        let parsed: Value = serde_json::from_str(&decrypted).unwrap();
        assert_eq!(parsed["x"], Value::from(42));
        assert_eq!(parsed["y"], Value::String("keep".into()));
    }

    #[test]
    fn json_root_match_round_trip() {
        let crypto = crypto();
        let doc = r#""hello""#;
        let paths = [Some("$")];

        let encrypted = encrypt_json(doc, &paths, None, &crypto).unwrap();
        let parsed: Value = serde_json::from_str(&encrypted).unwrap();
        assert!(parsed.is_string());
        assert_ne!(parsed, Value::String("hello".into()));

        let decrypted = decrypt_json(&encrypted, &paths, None, &crypto).unwrap();
        let parsed: Value = serde_json::from_str(&decrypted).unwrap();
        assert_eq!(parsed, Value::String("hello".into()));
    }

    #[test]
    fn empty_path_list_is_no_paths() {
        let crypto = crypto();
        let err = encrypt_json("{}", &[], None, &crypto).unwrap_err();
        assert_eq!(err, FieldError::NoPaths);
    }

    #[test]
    fn null_path_element_is_invalid() {
        let crypto = crypto();
        let err = encrypt_json("{}", &[None], None, &crypto).unwrap_err();
        assert_eq!(err, FieldError::InvalidPath { index: 0 });
    }

    #[test]
    fn unmatched_path_leaves_document_unchanged() {
        let crypto = crypto();
        let doc = r#"{"x": 1}"#;
        let encrypted = encrypt_json(doc, &[Some("$.missing")], None, &crypto).unwrap();
        let a: Value = serde_json::from_str(&encrypted).unwrap();
        let b: Value = serde_json::from_str(doc).unwrap();
        assert_eq!(a, b);
    }
}
