//! Cipher-text envelope codec (C1)
//!
//! Wire layout (v1):
//!   version[1] || ivLen[2 LE] || iv[ivLen] || ciphertext
//!
//! The envelope is self-describing for the IV only. It carries no
//! indication of which credential produced it — the caller supplies that
//! out of band.

use crate::error::CoreError;

/// Only version 1 is defined.
pub const PROTOCOL_VERSION: u8 = 1;

/// `isEnveloped` only accepts IV lengths produced by this library's own
/// algorithms (8 for DES/TripleDES/RC2, 16 for AES/Rijndael).
const PLAUSIBLE_IV_LENS: [u16; 2] = [8, 16];

/// A parsed envelope header: the IV and a view of the remaining ciphertext.
pub struct Header<'a> {
    pub iv: &'a [u8],
    pub ciphertext: &'a [u8],
}

/// Write `[version | ivLen_le_u16 | iv]` onto `sink`. Callers append
/// ciphertext bytes after calling this.
pub fn write_header(sink: &mut Vec<u8>, iv: &[u8]) {
    sink.push(PROTOCOL_VERSION);
    sink.extend_from_slice(&(iv.len() as u16).to_le_bytes());
    sink.extend_from_slice(iv);
}

/// Parse `[version | ivLen_le_u16 | iv | ciphertext]` out of `source`.
pub fn read_header(source: &[u8]) -> Result<Header<'_>, CoreError> {
    if source.is_empty() {
        return Err(CoreError::Truncated);
    }
    let version = source[0];
    if version != PROTOCOL_VERSION {
        return Err(CoreError::UnsupportedProtocol { version });
    }
    if source.len() < 3 {
        return Err(CoreError::Truncated);
    }
    let iv_len = u16::from_le_bytes([source[1], source[2]]) as usize;
    let iv_start = 3;
    let iv_end = iv_start + iv_len;
    if source.len() < iv_end {
        return Err(CoreError::Truncated);
    }
    Ok(Header {
        iv: &source[iv_start..iv_end],
        ciphertext: &source[iv_end..],
    })
}

/// Shape probe: does `bytes` look like something this codec produced?
///
/// This is not an authentication check — it inspects only the three-byte
/// prefix and the declared IV length, never the ciphertext bytes, and may
/// produce false positives on adversarial input.
pub fn is_enveloped(bytes: &[u8]) -> bool {
    if bytes.len() < 3 {
        return false;
    }
    if bytes[0] != PROTOCOL_VERSION {
        return false;
    }
    let iv_len = u16::from_le_bytes([bytes[1], bytes[2]]);
    if !PLAUSIBLE_IV_LENS.contains(&iv_len) {
        return false;
    }
    bytes.len() >= 3 + iv_len as usize
}
