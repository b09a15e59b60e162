//! Deterministic chunk identifiers.
//!
//! A chunk id is `<file content hash>-<ordinal>`, so rebuilding a knowledge
//! base from unchanged files reproduces identical ids.

/// Hex digest of a source file's raw bytes.
pub fn content_digest(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Id for the `ordinal`-th chunk of a file with the given digest.
pub fn chunk_id(digest: &str, ordinal: usize) -> String {
    format!("{digest}-{ordinal}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_and_distinct_per_ordinal() {
        let d = content_digest(b"hello world");
        assert_eq!(d, content_digest(b"hello world"));
        assert_ne!(d, content_digest(b"hello world!"));
        assert_eq!(chunk_id(&d, 0), format!("{d}-0"));
        assert_ne!(chunk_id(&d, 0), chunk_id(&d, 1));
    }
}
