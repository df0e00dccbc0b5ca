//! Error types for the credential registry, envelope codec, and crypto pipeline.

use std::fmt;

/// Errors surfaced by the registry, envelope codec, and symmetric pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A required argument (credential name, key material, ...) was absent.
    NullArgument { argument: String },
    /// The named credential is not present in the registry.
    CredentialNotFound { name: String },
    /// An algorithm tag outside the closed enumeration, or a tag/key-length
    /// combination the registry does not support.
    UnknownAlgorithm { detail: String },
    /// The envelope's version byte was not 1.
    UnsupportedProtocol { version: u8 },
    /// The envelope was shorter than its declared IV length.
    Truncated,
    /// The underlying block cipher rejected the input (bad padding, bad key
    /// length, misaligned block).
    CipherError { detail: String },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullArgument { argument } => write!(f, "missing required argument: {}", argument),
            Self::CredentialNotFound { name } => write!(f, "credential not found: {}", name),
            Self::UnknownAlgorithm { detail } => write!(f, "unknown algorithm: {}", detail),
            Self::UnsupportedProtocol { version } => {
                write!(f, "unsupported envelope protocol version: {}", version)
            }
            Self::Truncated => write!(f, "envelope truncated before declared IV length"),
            Self::CipherError { detail } => write!(f, "cipher error: {}", detail),
        }
    }
}

impl std::error::Error for CoreError {}

impl CoreError {
    pub fn unknown_algorithm(detail: impl Into<String>) -> Self {
        Self::UnknownAlgorithm { detail: detail.into() }
    }

    pub fn cipher_error(detail: impl Into<String>) -> Self {
        Self::CipherError { detail: detail.into() }
    }
}
