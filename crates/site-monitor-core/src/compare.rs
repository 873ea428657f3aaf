//! Snapshot comparison and content digests.
//!
//! Comparison is byte-exact. Whitespace, encoding and embedded timestamps are
//! not normalized, so a page that renders the current time is reported as
//! changed on every run.

use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

/// Returns `true` when the two bodies differ in any byte
#[must_use]
pub fn has_changed(previous: &[u8], current: &[u8]) -> bool {
    previous != current
}

/// Base64-encoded SHA-256 of a body, used in run reports
#[must_use]
pub fn content_digest(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    STANDARD.encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_bodies_are_unchanged() {
        assert!(!has_changed(b"A", b"A"));
        assert!(!has_changed(b"", b""));
    }

    #[test]
    fn test_single_byte_difference_is_a_change() {
        assert!(has_changed(b"<p>hello</p>", b"<p>hellp</p>"));
        assert!(has_changed(b"A", b"B"));
    }

    #[test]
    fn test_no_whitespace_normalization() {
        assert!(has_changed(b"a b", b"a  b"));
        assert!(has_changed(b"line\n", b"line\r\n"));
        assert!(has_changed(b"body", b"body\n"));
    }

    #[test]
    fn test_empty_previous_body_differs_from_content() {
        assert!(has_changed(b"", b"x"));
    }

    #[test]
    fn test_content_digest() {
        assert_eq!(
            content_digest(b""),
            "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
        );
        assert_eq!(content_digest(b"Hello, World!").len(), 44);
    }
}
