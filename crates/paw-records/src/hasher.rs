// hasher.rs — SHA-256 helpers for the record log hash chain.
//
// Hashes are lowercase hex so they read cleanly inside JSON lines.

use sha2::{Digest, Sha256};

/// Hash arbitrary bytes, returning a lowercase hex-encoded SHA-256 string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Hash one raw log line.
pub fn hash_line(line: &str) -> String {
    hash_bytes(line.as_bytes())
}
