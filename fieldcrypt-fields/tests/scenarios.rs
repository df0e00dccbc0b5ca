//! End-to-end field-encryption tests against the public API, rather than
//! the `#[cfg(test)]` internals of `xml.rs`/`json.rs`.

use fieldcrypt_core::{AlgorithmTag, Credential, CredentialRegistry, Crypto};
use fieldcrypt_fields::{decrypt_json, decrypt_xml, encrypt_json, encrypt_xml, FieldError};

fn crypto() -> Crypto {
    let registry = CredentialRegistry::builder()
        .add(
            Credential::new(Some("primary"), AlgorithmTag::Aes, vec![7u8; 32], 16).unwrap(),
            true,
        )
        .unwrap()
        .build();
    Crypto::new(registry)
}

/// `format_document` always prepends an `<?xml ... ?>` declaration, so
/// comparing serialized output against a raw input string has to strip it
/// first — the comparison is "equal as parsed XML", not byte-identical.
fn strip_xml_declaration(s: &str) -> &str {
    if let Some(rest) = s.strip_prefix("<?xml") {
        if let Some(end) = rest.find("?>") {
            return rest[end + 2..].trim_start();
        }
    }
    s
}

#[test]
fn xml_field_round_trip_leaves_sibling_untouched() {
    let crypto = crypto();
    let doc = "<r><a>secret</a><b>visible</b></r>";
    let paths = [Some("/r/a")];

    let encrypted = encrypt_xml(doc, &paths, None, &crypto).unwrap();
    assert!(encrypted.contains("<b>visible</b>"));
    assert!(!encrypted.contains(">secret<"));

    let decrypted = decrypt_xml(&encrypted, &paths, None, &crypto).unwrap();
    let got = strip_xml_declaration(&decrypted).replace(char::is_whitespace, "");
    let want = strip_xml_declaration(doc).replace(char::is_whitespace, "");
    assert_eq!(got, want);
}

#[test]
fn json_field_round_trip_preserves_type() {
    let crypto = crypto();
    let doc = r#"{"x": 42, "y": "keep"}"#;
    let paths = [Some("$.x")];

    let encrypted = encrypt_json(doc, &paths, None, &crypto).unwrap();
    let decrypted = decrypt_json(&encrypted, &paths, None, &crypto).unwrap();

    let original: serde_json::Value = serde_json::from_str(doc).unwrap();
    let restored: serde_json::Value = serde_json::from_str(&decrypted).unwrap();
    assert_eq!(original, restored);
}

/// When the matched path is the document root, the whole document becomes
/// the ciphertext.
#[test]
fn json_root_match_round_trip() {
    let crypto = crypto();
    let doc = r#""hello""#;
    let paths = [Some("$")];

    let encrypted = encrypt_json(doc, &paths, None, &crypto).unwrap();
    assert_ne!(encrypted, doc);

    let decrypted = decrypt_json(&encrypted, &paths, None, &crypto).unwrap();
    assert_eq!(decrypted, doc);
}

#[test]
fn empty_path_list_is_rejected_before_any_crypto_runs() {
    let crypto = crypto();
    assert_eq!(encrypt_xml("<r/>", &[], None, &crypto).unwrap_err(), FieldError::NoPaths);
    assert_eq!(encrypt_json("{}", &[], None, &crypto).unwrap_err(), FieldError::NoPaths);
}

/// Multiple paths in one call are applied in order, and a path that never
/// matches a credential-requiring operation never resolves a credential.
#[test]
fn unresolvable_credential_is_only_an_error_when_a_path_actually_matches() {
    let registry = CredentialRegistry::builder().build();
    let crypto = Crypto::new(registry);

    // No credentials registered at all, but the path never matches.
    let doc = r#"{"present": 1}"#;
    let result = encrypt_json(doc, &[Some("$.missing")], None, &crypto).unwrap();
    assert_eq!(result, doc);

    // Same empty registry, but this path matches — must fail.
    let err = encrypt_json(doc, &[Some("$.present")], None, &crypto).unwrap_err();
    assert!(matches!(err, FieldError::Crypto { .. }));
}

/// Multiple XML paths apply independently and in the order given.
#[test]
fn multiple_xml_paths_apply_in_order() {
    let crypto = crypto();
    let doc = "<order><customer><ssn>123-45-6789</ssn></customer><note>ok</note></order>";
    let paths = [Some("/order/customer/ssn"), Some("/order/note")];

    let encrypted = encrypt_xml(doc, &paths, None, &crypto).unwrap();
    assert!(!encrypted.contains("123-45-6789"));
    assert!(!encrypted.contains(">ok<"));

    let decrypted = decrypt_xml(&encrypted, &paths, None, &crypto).unwrap();
    assert!(decrypted.contains("123-45-6789"));
    assert!(decrypted.contains(">ok<"));
}
