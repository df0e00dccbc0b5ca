//! Random source (C3)
//!
//! Per-worker cryptographically strong byte generator for IVs.
//! `rand::thread_rng()` is itself a thread-local handle, lazily seeded from
//! the OS CSPRNG on first use per thread — contention-free and lazily
//! initialized without hand-rolling a CSPRNG.

use rand::RngCore;

/// Draw `n` cryptographically strong random bytes from this worker's RNG.
pub fn bytes(n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    rand::thread_rng().fill_bytes(&mut buf);
    buf
}
