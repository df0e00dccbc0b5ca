//! Field-level encryption of XML and JSON documents on top of
//! `fieldcrypt-core`'s credential-keyed symmetric primitives.
//!
//! Callers name the fields to protect with XPath 1.0 expressions (for XML)
//! or JSONPath expressions (for JSON); the engines here walk the matches in
//! document order and rewrite each one through a [`fieldcrypt_core::Crypto`]
//! facade, acquiring an encryptor or decryptor lazily so a call whose paths
//! never match never has to resolve a credential.

mod error;
pub mod json;
pub mod xml;

#[cfg(feature = "async")]
mod async_engine;

pub use error::FieldError;
pub use json::{decrypt_json, encrypt_json};
pub use xml::{decrypt_xml, encrypt_xml};

#[cfg(feature = "async")]
pub use async_engine::{decrypt_json_async, decrypt_xml_async, encrypt_json_async, encrypt_xml_async};
