//! Asynchronous field-level entry points.
//!
//! Unlike an already-completed `Future` wrapped around a synchronous call,
//! these genuinely suspend — once per JSON token rewritten, or once per
//! XPath expression's batch of matches for XML, since `sxd_document`'s
//! arena-backed tree is not `Send` and cannot be held live across an
//! arbitrary `.await` on a multi-threaded runtime. A [`CancellationToken`]
//! is checked at every suspension point; observing cancellation raises
//! [`FieldError::Canceled`] and leaves the document unpublished.

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use fieldcrypt_core::Crypto;

use crate::error::FieldError;
use crate::{json, xml};

/// Async XML encryption. Suspends once per path expression.
pub async fn encrypt_xml_async(
    document_xml: &str,
    paths: &[Option<&str>],
    credential_name: Option<&str>,
    crypto: &Crypto,
    cancel: &CancellationToken,
) -> Result<String, FieldError> {
    run_per_path(paths, cancel, || xml::encrypt_xml(document_xml, paths, credential_name, crypto)).await
}

/// Async XML decryption. Suspends once per path expression.
pub async fn decrypt_xml_async(
    document_xml: &str,
    paths: &[Option<&str>],
    credential_name: Option<&str>,
    crypto: &Crypto,
    cancel: &CancellationToken,
) -> Result<String, FieldError> {
    run_per_path(paths, cancel, || xml::decrypt_xml(document_xml, paths, credential_name, crypto)).await
}

/// `sxd_document` trees cannot be suspended mid-traversal, so the async XML
/// entry points check cancellation before each path expression's batch
/// rather than before each individual match, then hand off to the
/// synchronous engine for that batch.
async fn run_per_path<F>(paths: &[Option<&str>], cancel: &CancellationToken, run: F) -> Result<String, FieldError>
where
    F: FnOnce() -> Result<String, FieldError>,
{
    for (index, path) in paths.iter().enumerate() {
        if cancel.is_cancelled() {
            let label = path.unwrap_or("<null>");
            return Err(FieldError::Canceled { path: label.to_string(), match_index: index });
        }
        tokio::task::yield_now().await;
    }
    run()
}

/// Async JSON encryption. Suspends once per matched token.
pub async fn encrypt_json_async(
    document_json: &str,
    paths: &[Option<&str>],
    credential_name: Option<&str>,
    crypto: &Crypto,
    cancel: &CancellationToken,
) -> Result<String, FieldError> {
    if paths.is_empty() {
        return Err(FieldError::NoPaths);
    }

    let mut value: Value = serde_json::from_str(document_json).map_err(|e| FieldError::parse(e.to_string()))?;
    let mut encryptor = None;

    for (index, path) in paths.iter().enumerate() {
        let expr = path.filter(|p| !p.is_empty()).ok_or(FieldError::InvalidPath { index })?;

        let matches = jsonpath_lib::select(&value, expr).unwrap_or_default();
        if matches.is_empty() {
            continue;
        }
        if encryptor.is_none() {
            encryptor = Some(crypto.get_encryptor(credential_name).map_err(|e| FieldError::crypto(expr, 0, e))?);
        }
        let encryptor = encryptor.as_ref().expect("just initialized above");

        let snapshot: Vec<Value> = matches.into_iter().cloned().collect();
        let mut replacements = Vec::with_capacity(snapshot.len());

        for (match_index, matched) in snapshot.into_iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(FieldError::Canceled { path: expr.to_string(), match_index });
            }

            let minified = serde_json::to_string(&matched).unwrap_or_default();
            let ciphertext = encryptor
                .encrypt_string(&minified)
                .map_err(|e| FieldError::crypto(expr, match_index, e))?;
            replacements.push(Value::String(ciphertext));

            tokio::task::yield_now().await;
        }

        let mut cursor = 0usize;
        value = jsonpath_lib::replace_with(value, expr, &mut |_matched| {
            let replacement = replacements[cursor].clone();
            cursor += 1;
            Some(replacement)
        })
        .map_err(|e| FieldError::parse(e.to_string()))?;
    }

    serde_json::to_string(&value).map_err(|e| FieldError::parse(e.to_string()))
}

/// Async JSON decryption. Suspends once per matched token.
pub async fn decrypt_json_async(
    document_json: &str,
    paths: &[Option<&str>],
    credential_name: Option<&str>,
    crypto: &Crypto,
    cancel: &CancellationToken,
) -> Result<String, FieldError> {
    if paths.is_empty() {
        return Err(FieldError::NoPaths);
    }

    let mut value: Value = serde_json::from_str(document_json).map_err(|e| FieldError::parse(e.to_string()))?;
    let mut decryptor = None;

    for (index, path) in paths.iter().enumerate() {
        let expr = path.filter(|p| !p.is_empty()).ok_or(FieldError::InvalidPath { index })?;

        let matches = jsonpath_lib::select(&value, expr).unwrap_or_default();
        if matches.is_empty() {
            continue;
        }
        if decryptor.is_none() {
            decryptor = Some(crypto.get_decryptor(credential_name).map_err(|e| FieldError::crypto(expr, 0, e))?);
        }
        let decryptor = decryptor.as_ref().expect("just initialized above");

        let snapshot: Vec<Value> = matches.into_iter().cloned().collect();
        let mut replacements = Vec::with_capacity(snapshot.len());

        for (match_index, matched) in snapshot.into_iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(FieldError::Canceled { path: expr.to_string(), match_index });
            }

            let replacement = match &matched {
                Value::String(raw) => match decryptor.decrypt_string(raw) {
                    Ok(decrypted) if &decrypted == raw => matched.clone(),
                    Ok(decrypted) => serde_json::from_str::<Value>(&decrypted)
                        .map_err(|e| FieldError::parse(format!("decrypted value is not valid JSON: {e}")))?,
                    Err(e) => return Err(FieldError::crypto(expr, match_index, e)),
                },
                _ => matched.clone(),
            };
            replacements.push(replacement);

            tokio::task::yield_now().await;
        }

        let mut cursor = 0usize;
        value = jsonpath_lib::replace_with(value, expr, &mut |_matched| {
            let replacement = replacements[cursor].clone();
            cursor += 1;
            Some(replacement)
        })
        .map_err(|e| FieldError::parse(e.to_string()))?;
    }

    serde_json::to_string(&value).map_err(|e| FieldError::parse(e.to_string()))
}
