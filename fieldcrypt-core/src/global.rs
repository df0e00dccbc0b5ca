//! Process-wide ambient accessor — convenience only.
//!
//! Internal code never reads this; every entry point in [`crate::facade`]
//! takes its [`Crypto`] explicitly. This module exists so callers who
//! genuinely want a process-scoped, set-once-at-startup instance have a
//! small, explicit place to put it.

use once_cell::sync::OnceCell;

use crate::facade::Crypto;

static GLOBAL: OnceCell<Crypto> = OnceCell::new();

/// Set the process-wide `Crypto` instance. Intended to be called once at
/// startup. Returns the value back on error if it was already set.
pub fn set_global(crypto: Crypto) -> Result<(), Crypto> {
    GLOBAL.set(crypto)
}

/// Read the process-wide `Crypto` instance.
///
/// # Panics
///
/// Panics if [`set_global`] was never called. This is a convenience layer,
/// not a fallback path — callers who can't guarantee startup ordering
/// should hold a `Crypto` explicitly instead.
pub fn global() -> &'static Crypto {
    GLOBAL.get().expect("fieldcrypt_core::global::set_global was never called")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::AlgorithmTag;
    use crate::credential::{Credential, CredentialRegistry};

    #[test]
    fn set_then_get_round_trips() {
        let registry = CredentialRegistry::builder()
            .add(
                Credential::new(Some("primary"), AlgorithmTag::Aes, vec![1u8; 16], 16).unwrap(),
                true,
            )
            .unwrap()
            .build();

        // OnceCell is process-global; this test only checks the API shape,
        // not exclusive ownership of the slot (other tests in this binary
        // may have already set it).
        let _ = set_global(Crypto::new(registry));
        let crypto = global();
        assert!(crypto.can_encrypt(None));
    }
}
