use sha2::{Digest, Sha256};

/// Filesystem-safe, deterministic filename for a storage key:
/// `{sanitized_key}--{short_hash(key)}.json`.
///
/// The hash keeps distinct keys apart even when sanitizing maps them to the
/// same stem.
pub fn storage_filename(key: &str) -> String {
    let sanitized = sanitize_key(key);
    let hash = short_hash(key);
    format!("{sanitized}--{hash}.json")
}

fn sanitize_key(input: &str) -> String {
    let mut cleaned: String = input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned = cleaned.trim_matches('_').to_string();
    if cleaned.is_empty() {
        cleaned = "key".to_string();
    }
    if cleaned.len() > 64 {
        cleaned.truncate(64);
    }
    cleaned
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
