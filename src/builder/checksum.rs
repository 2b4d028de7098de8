//! Artifact checksum calculation.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of `contents` (64 characters).
pub fn calculate_sha256(contents: &[u8]) -> String {
    format!("{:x}", Sha256::digest(contents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            calculate_sha256(b"foo"),
            "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae"
        );
    }
}
