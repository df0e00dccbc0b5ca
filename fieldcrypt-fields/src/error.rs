//! Error types for the field-level engine.

use std::fmt;

use fieldcrypt_core::CoreError;

/// Errors surfaced by [`crate::xml`] and [`crate::json`].
///
/// A failure mid-traversal does not roll back earlier rewrites; `path` and
/// `match_index` carry enough context for the caller to decide what to do
/// about the partially-rewritten document.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// The path list was empty.
    NoPaths,
    /// A null or empty element appeared in the path list.
    InvalidPath { index: usize },
    /// The caller's cancellation signal was observed before a per-field
    /// crypto operation ran.
    Canceled { path: String, match_index: usize },
    /// The XML document or XPath expression could not be parsed/evaluated.
    Parse { detail: String },
    /// A per-field encrypt/decrypt call failed.
    Crypto {
        path: String,
        match_index: usize,
        source: CoreError,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPaths => write!(f, "no path expressions were supplied"),
            Self::InvalidPath { index } => write!(f, "null or empty path at index {index}"),
            Self::Canceled { path, match_index } => {
                write!(f, "canceled while rewriting match {match_index} of path '{path}'")
            }
            Self::Parse { detail } => write!(f, "parse error: {detail}"),
            Self::Crypto { path, match_index, source } => {
                write!(f, "crypto error at match {match_index} of path '{path}': {source}")
            }
        }
    }
}

impl std::error::Error for FieldError {}

impl FieldError {
    pub fn crypto(path: impl Into<String>, match_index: usize, source: CoreError) -> Self {
        Self::Crypto { path: path.into(), match_index, source }
    }

    pub fn parse(detail: impl Into<String>) -> Self {
        Self::Parse { detail: detail.into() }
    }
}
