//! SHA-256 content digests of serialized artifacts.
//!
//! Digests are always taken over the exact bytes written to disk, never over
//! an in-memory graph.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{GraphError, Result};

/// Lowercase hex SHA-256 of `bytes` (64 characters).
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Returns true if `value` is a 64-character lowercase hex digest.
#[must_use]
pub fn is_digest(value: &str) -> bool {
    value.len() == 64 && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Writes `bytes` to `artifact`, then writes its digest to `digest_path`.
///
/// The digest file holds the 64 hex characters and nothing else. Parent
/// directories are created as needed. Returns the digest.
///
/// # Errors
///
/// Returns [`GraphError::Io`] if either file cannot be written.
pub fn write_with_digest(artifact: &Path, bytes: &[u8], digest_path: &Path) -> Result<String> {
    write_file(artifact, bytes)?;
    let digest = sha256_hex(bytes);
    write_file(digest_path, digest.as_bytes())?;
    tracing::debug!(artifact = %artifact.display(), %digest, "wrote artifact");
    Ok(digest)
}

/// Writes `bytes` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`GraphError::Io`] on filesystem failure.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| GraphError::io(parent, e))?;
    }
    fs::write(path, bytes).map_err(|e| GraphError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_digest() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_file_holds_only_the_digest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ttl = dir.path().join("ttl/a.ttl");
        let sha = dir.path().join("hash/a.sha256");
        let digest = write_with_digest(&ttl, b"hello", &sha).expect("write");
        let written = fs::read_to_string(&sha).expect("read digest");
        assert_eq!(written, digest);
        assert!(is_digest(&written));
        assert_eq!(sha256_hex(&fs::read(&ttl).expect("read ttl")), digest);
    }

    #[test]
    fn rejects_uppercase_digest() {
        assert!(!is_digest(&"A".repeat(64)));
        assert!(!is_digest("abc"));
    }
}
