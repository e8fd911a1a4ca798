use blake3::Hasher;

/// Content fingerprint used for duplicate detection.
///
/// Whitespace runs are collapsed before hashing, so a re-export of the same
/// document with different line wrapping still collides with the original.
pub fn fingerprint_text(text: &str) -> String {
    let mut hasher = Hasher::new();
    let mut first = true;
    for word in text.split_whitespace() {
        if !first {
            hasher.update(b" ");
        }
        hasher.update(word.as_bytes());
        first = false;
    }
    hasher.finalize().to_hex().to_string()
}

#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}
