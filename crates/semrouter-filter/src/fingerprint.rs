// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cache keys derived from prompt text.

use xxhash_rust::xxh3::xxh3_64;

/// Namespace prepended to every key so the cache can be shared safely.
pub const CACHE_KEY_PREFIX: &str = "sr:";

/// Deterministic, non-cryptographic fingerprint of a prompt.
///
/// Surrounding whitespace is ignored; everything else, including case, is
/// significant.
pub fn fingerprint(prompt: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{:016x}", xxh3_64(prompt.trim().as_bytes()))
}
